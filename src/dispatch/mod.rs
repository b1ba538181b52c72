// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request dispatch engine: ordered handler matching, interceptor
//! pipeline, and error-handler fallback.
//!
//! One call to [`Dispatcher::dispatch`] is one turn:
//!
//! 1. Build a fresh [`RequestContext`] (including a per-turn
//!    [`Translator`] resolved from the request's locale).
//! 2. Run request interceptors in registration order.
//! 3. Select the first registered handler whose `matches` accepts the
//!    request. No match is a normal outcome
//!    ([`DispatchOutcome::Unhandled`]), not an error.
//! 4. Execute the handler, then run response interceptors in order.
//! 5. Any failure in 2–4 transfers to the error-handler chain, first
//!    match wins. If no error handler matches, the failure propagates.
//!
//! Registration order is the only disambiguator between handlers: when two
//! handlers both match, the first registered wins, always. That makes the
//! order handlers are added part of the registry's contract — a broad
//! catch-all added early shadows everything added after it.
//!
//! The dispatcher itself is immutable after build and shareable across
//! threads; everything turn-scoped lives in the per-call context, so
//! concurrent turns never observe each other's locale or attributes.

use crate::i18n::{Lang, Translator};
use crate::types::{Request, Response};
use anyhow::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Per-turn mutable scratch space shared by interceptors and handlers.
///
/// Owns the request, the turn's translate function, and a free-form
/// attribute map. Created by the dispatcher at the top of a turn and
/// discarded once the response is produced.
pub struct RequestContext {
    request: Request,
    translator: Translator,
    attributes: HashMap<String, serde_json::Value>,
}

impl RequestContext {
    /// Build the context for one turn, resolving the request's raw locale
    /// tag into a per-turn translator. Rebuilt every turn on purpose: the
    /// locale can differ turn to turn, and a shared localization client
    /// would bleed one turn's language into another under concurrency.
    pub fn new(request: Request) -> RequestContext {
        let translator = Translator::new(Lang::from_tag(&request.locale));
        RequestContext {
            request,
            translator,
            attributes: HashMap::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The turn's translate function.
    pub fn t(&self) -> &Translator {
        &self.translator
    }

    /// Read a request-scoped attribute set earlier in the turn.
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Write a request-scoped attribute for later pipeline steps.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(key.into(), value);
    }
}

/// A registered request handler: a predicate plus an action.
pub trait RequestHandler: Send + Sync {
    /// Stable identifier used in logs and error context.
    fn name(&self) -> &'static str;

    /// Whether this handler claims the request. Must be cheap and
    /// side-effect free; the registry may probe many handlers per turn.
    fn matches(&self, request: &Request) -> bool;

    /// Produce the turn's response. Any `Err` transfers control to the
    /// error-handler chain.
    fn execute(&self, ctx: &mut RequestContext) -> Result<Response>;
}

/// A registered error handler, consulted only after a dispatch fault.
pub trait ErrorHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this handler claims the fault.
    fn matches(&self, error: &Error) -> bool;

    /// Produce the fallback response for a claimed fault.
    fn execute(&self, ctx: &mut RequestContext, error: &Error) -> Result<Response>;
}

/// Pre-dispatch pipeline step. May mutate the context but cannot
/// short-circuit dispatch; an `Err` is a dispatch fault.
pub trait RequestInterceptor: Send + Sync {
    fn process(&self, ctx: &mut RequestContext) -> Result<()>;
}

/// Post-dispatch pipeline step observing the produced response.
pub trait ResponseInterceptor: Send + Sync {
    fn process(&self, ctx: &RequestContext, response: &Response) -> Result<()>;
}

/// Outcome of one turn.
///
/// `Unhandled` is deliberately distinct from any `Response` value: no
/// registered handler claimed the request, no response exists, and no
/// error handler ran. The caller decides what an unhandled turn means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled(Response),
    Unhandled,
}

impl DispatchOutcome {
    pub fn is_unhandled(&self) -> bool {
        matches!(self, DispatchOutcome::Unhandled)
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            DispatchOutcome::Handled(response) => Some(response),
            DispatchOutcome::Unhandled => None,
        }
    }
}

/// Ordered registry builder. Registration order is contract: first match
/// wins for both request handlers and error handlers.
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

impl DispatcherBuilder {
    pub fn new() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            handlers: self.handlers,
            error_handlers: self.error_handlers,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
        }
    }
}

/// The turn orchestrator. Immutable after build; dispatch takes `&self`.
pub struct Dispatcher {
    handlers: Vec<Box<dyn RequestHandler>>,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Run one turn end to end.
    ///
    /// Returns `Ok(Unhandled)` when no handler claims the request,
    /// `Ok(Handled(..))` with either the handler's response or an error
    /// handler's fallback, and `Err` only when a fault occurred and no
    /// registered error handler claimed it.
    pub fn dispatch(&self, request: Request) -> Result<DispatchOutcome> {
        let mut ctx = RequestContext::new(request);
        match self.run_turn(&mut ctx) {
            Ok(outcome) => Ok(outcome),
            Err(error) => self.recover(&mut ctx, error).map(DispatchOutcome::Handled),
        }
    }

    fn run_turn(&self, ctx: &mut RequestContext) -> Result<DispatchOutcome> {
        for interceptor in &self.request_interceptors {
            interceptor.process(ctx)?;
        }

        let handler = match self
            .handlers
            .iter()
            .find(|handler| handler.matches(ctx.request()))
        {
            Some(handler) => handler,
            None => {
                debug!(locale = %ctx.request().locale, "no handler claimed request");
                return Ok(DispatchOutcome::Unhandled);
            }
        };

        debug!(handler = handler.name(), "dispatching request");
        let response = handler.execute(ctx)?;

        for interceptor in &self.response_interceptors {
            interceptor.process(ctx, &response)?;
        }
        Ok(DispatchOutcome::Handled(response))
    }

    fn recover(&self, ctx: &mut RequestContext, error: Error) -> Result<Response> {
        for handler in &self.error_handlers {
            if handler.matches(&error) {
                warn!(
                    handler = handler.name(),
                    error = %error,
                    "dispatch fault recovered",
                );
                return handler.execute(ctx, &error);
            }
        }
        // No error handler claimed the fault; the caller owns it now.
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct Always(&'static str);

    impl RequestHandler for Always {
        fn name(&self) -> &'static str {
            self.0
        }
        fn matches(&self, _request: &Request) -> bool {
            true
        }
        fn execute(&self, _ctx: &mut RequestContext) -> Result<Response> {
            Ok(Response::speak(self.0).build())
        }
    }

    struct Never;

    impl RequestHandler for Never {
        fn name(&self) -> &'static str {
            "never"
        }
        fn matches(&self, _request: &Request) -> bool {
            false
        }
        fn execute(&self, _ctx: &mut RequestContext) -> Result<Response> {
            unreachable!("never matches")
        }
    }

    struct Failing;

    impl RequestHandler for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn matches(&self, _request: &Request) -> bool {
            true
        }
        fn execute(&self, _ctx: &mut RequestContext) -> Result<Response> {
            Err(anyhow!("boom"))
        }
    }

    struct CatchAll;

    impl ErrorHandler for CatchAll {
        fn name(&self) -> &'static str {
            "catch_all"
        }
        fn matches(&self, _error: &Error) -> bool {
            true
        }
        fn execute(&self, _ctx: &mut RequestContext, _error: &Error) -> Result<Response> {
            Ok(Response::speak("fallback").build())
        }
    }

    fn request() -> Request {
        Request::session_start("en-US")
    }

    #[test]
    fn first_registered_matching_handler_wins() {
        let dispatcher = Dispatcher::builder()
            .handler(Never)
            .handler(Always("first"))
            .handler(Always("second"))
            .build();
        let response = dispatcher
            .dispatch(request())
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.speech, "first");
    }

    #[test]
    fn adding_a_handler_after_a_match_never_changes_the_outcome() {
        let base = Dispatcher::builder().handler(Always("winner")).build();
        let extended = Dispatcher::builder()
            .handler(Always("winner"))
            .handler(Always("latecomer"))
            .build();
        assert_eq!(
            base.dispatch(request()).unwrap(),
            extended.dispatch(request()).unwrap(),
        );
    }

    #[test]
    fn no_matching_handler_is_unhandled_not_error() {
        let dispatcher = Dispatcher::builder()
            .handler(Never)
            .error_handler(CatchAll)
            .build();
        let outcome = dispatcher.dispatch(request()).unwrap();
        assert!(outcome.is_unhandled());
        assert_eq!(outcome.into_response(), None);
    }

    #[test]
    fn handler_fault_is_recovered_by_error_chain() {
        let dispatcher = Dispatcher::builder()
            .handler(Failing)
            .error_handler(CatchAll)
            .build();
        let response = dispatcher
            .dispatch(request())
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.speech, "fallback");
    }

    #[test]
    fn unclaimed_fault_propagates() {
        struct Picky;
        impl ErrorHandler for Picky {
            fn name(&self) -> &'static str {
                "picky"
            }
            fn matches(&self, error: &Error) -> bool {
                error.to_string().contains("something else")
            }
            fn execute(&self, _ctx: &mut RequestContext, _error: &Error) -> Result<Response> {
                unreachable!("never matches the boom error")
            }
        }

        let dispatcher = Dispatcher::builder()
            .handler(Failing)
            .error_handler(Picky)
            .build();
        let err = dispatcher.dispatch(request()).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn request_interceptor_fault_routes_through_error_chain() {
        struct Tripwire;
        impl RequestInterceptor for Tripwire {
            fn process(&self, _ctx: &mut RequestContext) -> Result<()> {
                Err(anyhow!("interceptor fault"))
            }
        }

        let dispatcher = Dispatcher::builder()
            .request_interceptor(Tripwire)
            .handler(Always("unreached"))
            .error_handler(CatchAll)
            .build();
        let response = dispatcher
            .dispatch(request())
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.speech, "fallback");
    }

    #[test]
    fn response_interceptor_fault_routes_through_error_chain() {
        struct Tripwire;
        impl ResponseInterceptor for Tripwire {
            fn process(&self, _ctx: &RequestContext, _response: &Response) -> Result<()> {
                Err(anyhow!("observer fault"))
            }
        }

        let dispatcher = Dispatcher::builder()
            .handler(Always("produced"))
            .response_interceptor(Tripwire)
            .error_handler(CatchAll)
            .build();
        let response = dispatcher
            .dispatch(request())
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.speech, "fallback");
    }

    #[test]
    fn interceptors_run_in_order_and_share_attributes() {
        struct Stamp(&'static str);
        impl RequestInterceptor for Stamp {
            fn process(&self, ctx: &mut RequestContext) -> Result<()> {
                let mut trail = ctx
                    .attribute("trail")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                trail.push_str(self.0);
                ctx.set_attribute("trail", serde_json::json!(trail));
                Ok(())
            }
        }

        struct Echo;
        impl RequestHandler for Echo {
            fn name(&self) -> &'static str {
                "echo"
            }
            fn matches(&self, _request: &Request) -> bool {
                true
            }
            fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
                let trail = ctx
                    .attribute("trail")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                Ok(Response::speak(trail).build())
            }
        }

        let dispatcher = Dispatcher::builder()
            .request_interceptor(Stamp("a"))
            .request_interceptor(Stamp("b"))
            .handler(Echo)
            .build();
        let response = dispatcher
            .dispatch(request())
            .unwrap()
            .into_response()
            .unwrap();
        assert_eq!(response.speech, "ab");
    }

    #[test]
    fn context_translator_follows_request_locale() {
        let ctx = RequestContext::new(Request::intent("GetFactIntent", "es-MX"));
        assert_eq!(ctx.t().lang(), Lang::Es);
        let ctx = RequestContext::new(Request::intent("GetFactIntent", "de-DE"));
        assert_eq!(ctx.t().lang(), Lang::En);
    }
}
