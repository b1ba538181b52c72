// SPDX-License-Identifier: PMPL-1.0-or-later

//! The space-facts skill: concrete handlers, catch-all error handler,
//! logging interceptors, and the wiring that assembles them into a
//! [`Dispatcher`].
//!
//! Handler registration order is part of the skill's contract (first match
//! wins). The reflector handler matches *every* intent, so it must stay
//! last; anything registered after it would be unreachable.

use crate::dispatch::{
    Dispatcher, ErrorHandler, RequestContext, RequestHandler, RequestInterceptor,
    ResponseInterceptor,
};
use crate::facts::{FactTable, OsRandom, RandomSource};
use crate::i18n::{catalog, validate as validate_catalog};
use crate::types::{Request, RequestKind, Response};
use anyhow::{Error, Result};
use std::sync::Arc;
use tracing::info;

// Intent identifiers as classified by the upstream platform.
pub const GET_FACT_INTENT: &str = "GetFactIntent";
pub const HELLO_WORLD_INTENT: &str = "HelloWorldIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// Assemble the skill with its built-in fact table and OS randomness.
pub fn default_skill() -> Result<Dispatcher> {
    build_skill(FactTable::builtin(), Arc::new(OsRandom))
}

/// Assemble the skill dispatcher.
///
/// Fails fast on configuration defects: an incomplete message catalog or a
/// fact table with a missing/empty language entry is rejected here, before
/// any request is served.
pub fn build_skill(table: FactTable, rng: Arc<dyn RandomSource>) -> Result<Dispatcher> {
    validate_catalog()?;
    table.validate()?;

    Ok(Dispatcher::builder()
        .request_interceptor(RequestLogInterceptor)
        .handler(LaunchHandler)
        .handler(GetFactHandler { table, rng })
        .handler(HelloHandler)
        .handler(HelpHandler)
        .handler(StopHandler)
        .handler(FallbackHandler)
        .handler(SessionEndedHandler)
        .handler(ReflectorHandler)
        .error_handler(GenericErrorHandler)
        .response_interceptor(ResponseLogInterceptor)
        .build())
}

// ─── Request handlers ───────────────────────────────────────────────

/// Session-start turn: spoken welcome, session stays open.
pub struct LaunchHandler;

impl RequestHandler for LaunchHandler {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn matches(&self, request: &Request) -> bool {
        matches!(request.kind, RequestKind::SessionStart)
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let speech = ctx.t().text(catalog::WELCOME)?;
        Ok(Response::speak(speech).reprompt(speech).build())
    }
}

/// `GetFactIntent`: one uniformly random fact in the request's language.
pub struct GetFactHandler {
    pub table: FactTable,
    pub rng: Arc<dyn RandomSource>,
}

impl RequestHandler for GetFactHandler {
    fn name(&self) -> &'static str {
        "get_fact"
    }

    fn matches(&self, request: &Request) -> bool {
        request.is_intent(GET_FACT_INTENT)
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let lang = ctx.t().lang();
        let fact = self.table.pick(lang, self.rng.as_ref())?.to_string();
        let reprompt = ctx.t().text(catalog::FACT_REPROMPT)?;
        Ok(Response::speak(fact).reprompt(reprompt).build())
    }
}

/// `HelloWorldIntent`: fixed English greeting (unlocalized upstream, kept
/// that way).
pub struct HelloHandler;

impl RequestHandler for HelloHandler {
    fn name(&self) -> &'static str {
        "hello"
    }

    fn matches(&self, request: &Request) -> bool {
        request.is_intent(HELLO_WORLD_INTENT)
    }

    fn execute(&self, _ctx: &mut RequestContext) -> Result<Response> {
        Ok(Response::speak("Hello World!")
            .reprompt("Would you like to hear more?")
            .build())
    }
}

/// `AMAZON.HelpIntent`: usage hint plus a generic reprompt.
pub struct HelpHandler;

impl RequestHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn matches(&self, request: &Request) -> bool {
        request.is_intent(HELP_INTENT)
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let speech = ctx.t().text(catalog::HELP)?;
        let reprompt = ctx.t().text(catalog::REPROMPT)?;
        Ok(Response::speak(speech).reprompt(reprompt).build())
    }
}

/// `AMAZON.CancelIntent` / `AMAZON.StopIntent`: goodbye and close the
/// session.
pub struct StopHandler;

impl RequestHandler for StopHandler {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn matches(&self, request: &Request) -> bool {
        request.is_intent(CANCEL_INTENT) || request.is_intent(STOP_INTENT)
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let speech = ctx.t().text(catalog::GOODBYE)?;
        Ok(Response::speak(speech).end_session().build())
    }
}

/// `AMAZON.FallbackIntent`: the platform matched no skill utterance.
pub struct FallbackHandler;

impl RequestHandler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, request: &Request) -> bool {
        request.is_intent(FALLBACK_INTENT)
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let speech = ctx.t().text(catalog::FALLBACK)?;
        let reprompt = ctx.t().text(catalog::REPROMPT)?;
        Ok(Response::speak(speech).reprompt(reprompt).build())
    }
}

/// Session-end turn: log the platform's reason, say nothing.
pub struct SessionEndedHandler;

impl RequestHandler for SessionEndedHandler {
    fn name(&self) -> &'static str {
        "session_ended"
    }

    fn matches(&self, request: &Request) -> bool {
        matches!(request.kind, RequestKind::SessionEnd { .. })
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        if let RequestKind::SessionEnd { reason } = &ctx.request().kind {
            info!(reason = reason.as_deref().unwrap_or("unknown"), "session ended");
        }
        Ok(Response::silent_end())
    }
}

/// Diagnostic tail handler: echoes any intent no earlier handler claimed.
/// Must be registered last — it matches every intent.
pub struct ReflectorHandler;

impl RequestHandler for ReflectorHandler {
    fn name(&self) -> &'static str {
        "reflector"
    }

    fn matches(&self, request: &Request) -> bool {
        matches!(request.kind, RequestKind::Intent { .. })
    }

    fn execute(&self, ctx: &mut RequestContext) -> Result<Response> {
        let intent = ctx.request().intent_name().unwrap_or("unknown").to_string();
        let speech = ctx.t().format(catalog::REFLECT, &[&intent])?;
        Ok(Response::speak(speech).build())
    }
}

// ─── Error handler ──────────────────────────────────────────────────

/// Catch-all fallback: any dispatch fault becomes a localized apology.
/// Required in the registry — with it in place, no turn-level fault ever
/// reaches the caller as an error.
pub struct GenericErrorHandler;

impl ErrorHandler for GenericErrorHandler {
    fn name(&self) -> &'static str {
        "generic_error"
    }

    fn matches(&self, _error: &Error) -> bool {
        true
    }

    fn execute(&self, ctx: &mut RequestContext, error: &Error) -> Result<Response> {
        info!(error = %error, "error handled");
        let speech = ctx.t().text(catalog::ERROR)?;
        let reprompt = ctx.t().text(catalog::REPROMPT)?;
        Ok(Response::speak(speech).reprompt(reprompt).build())
    }
}

// ─── Interceptors ───────────────────────────────────────────────────

/// Logs every inbound request before handler selection.
pub struct RequestLogInterceptor;

impl RequestInterceptor for RequestLogInterceptor {
    fn process(&self, ctx: &mut RequestContext) -> Result<()> {
        let envelope = serde_json::to_string(ctx.request())?;
        info!(request = %envelope, "incoming request");
        Ok(())
    }
}

/// Logs every outbound response after the handler ran.
pub struct ResponseLogInterceptor;

impl ResponseInterceptor for ResponseLogInterceptor {
    fn process(&self, _ctx: &RequestContext, response: &Response) -> Result<()> {
        let envelope = serde_json::to_string(response)?;
        info!(response = %envelope, "outgoing response");
        Ok(())
    }
}
