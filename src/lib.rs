// SPDX-License-Identifier: PMPL-1.0-or-later

//! Astrofact — locale-aware request dispatch for voice-assistant skills.
//!
//! This crate is the dispatch engine behind a multilingual space-facts
//! skill. The hosting platform has already turned speech into a discrete
//! intent; what remains — and what lives here — is the part with actual
//! control flow:
//!
//! ENGINE PILLARS:
//! 1. **Dispatch**: ordered first-match handler selection with a
//!    request/response interceptor pipeline and an error-handler chain
//!    that turns faults into spoken apologies instead of crashes.
//! 2. **I18n**: narrowing of raw locale tags to supported languages and a
//!    per-turn translate function over an embedded message catalog.
//! 3. **Facts**: per-language fact data with injectable, uniform random
//!    selection.
//!
//! Everything turn-scoped is rebuilt per request; the only process-wide
//! state (catalog and fact table) is immutable after startup validation.

pub mod dispatch;
pub mod facts;
pub mod i18n;
pub mod skill;
pub mod types;
