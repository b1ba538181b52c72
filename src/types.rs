// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for astrofact
//!
//! Defines the inbound request envelope and outbound response envelope
//! exchanged with the hosting voice platform. Both are turn-scoped: built
//! once per inbound turn, consumed, and discarded. The wire shapes follow
//! the platform envelope exactly:
//!
//! ```json
//! { "type": "intent", "intent": "GetFactIntent", "locale": "es-MX" }
//! { "speech": "...", "reprompt": "...", "shouldEndSession": false }
//! ```

use serde::{Deserialize, Serialize};

/// Request discriminator plus type-specific payload.
///
/// The upstream platform has already classified the utterance; by the time
/// a request reaches this crate, intents are plain identifiers such as
/// `"GetFactIntent"` or `"AMAZON.StopIntent"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RequestKind {
    /// Session opened without a specific intent (the "launch" turn).
    SessionStart,
    /// A classified intent carrying its identifier.
    Intent { intent: String },
    /// Session closed by the platform, optionally with a reason string.
    SessionEnd {
        #[serde(
            rename = "sessionEndReason",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        reason: Option<String>,
    },
}

/// One inbound voice-assistant turn. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(flatten)]
    pub kind: RequestKind,
    /// Raw locale tag as sent by the platform, e.g. `"es-ES"` or `"en-GB"`.
    /// Narrowed to a supported language by [`crate::i18n::Lang::from_tag`].
    pub locale: String,
}

impl Request {
    pub fn session_start(locale: impl Into<String>) -> Self {
        Request {
            kind: RequestKind::SessionStart,
            locale: locale.into(),
        }
    }

    pub fn intent(intent: impl Into<String>, locale: impl Into<String>) -> Self {
        Request {
            kind: RequestKind::Intent {
                intent: intent.into(),
            },
            locale: locale.into(),
        }
    }

    pub fn session_end(reason: Option<String>, locale: impl Into<String>) -> Self {
        Request {
            kind: RequestKind::SessionEnd { reason },
            locale: locale.into(),
        }
    }

    /// Intent identifier, if this turn carries one.
    pub fn intent_name(&self) -> Option<&str> {
        match &self.kind {
            RequestKind::Intent { intent } => Some(intent),
            _ => None,
        }
    }

    /// True when this turn carries the named intent.
    pub fn is_intent(&self, name: &str) -> bool {
        self.intent_name() == Some(name)
    }
}

/// Outbound response envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Text the platform should speak to the user.
    pub speech: String,
    /// Follow-up prompt spoken if the user stays silent. Absent when the
    /// handler does not expect a reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
    /// Whether the platform should close the session after speaking.
    pub should_end_session: bool,
}

impl Response {
    /// Start building a response from the primary speech text.
    pub fn speak(speech: impl Into<String>) -> ResponseBuilder {
        ResponseBuilder {
            speech: speech.into(),
            reprompt: None,
            should_end_session: false,
        }
    }

    /// Empty terminal response, used when the session is torn down and
    /// there is nothing left to say.
    pub fn silent_end() -> Response {
        Response {
            speech: String::new(),
            reprompt: None,
            should_end_session: true,
        }
    }
}

/// Fluent builder mirroring the platform SDK's response builder.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    speech: String,
    reprompt: Option<String>,
    should_end_session: bool,
}

impl ResponseBuilder {
    pub fn reprompt(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = Some(reprompt.into());
        self
    }

    pub fn end_session(mut self) -> Self {
        self.should_end_session = true;
        self
    }

    pub fn build(self) -> Response {
        Response {
            speech: self.speech,
            reprompt: self.reprompt,
            should_end_session: self.should_end_session,
        }
    }
}
