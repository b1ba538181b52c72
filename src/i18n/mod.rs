// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation module for astrofact.
//!
//! Provides a data-driven translation system over a compile-time message
//! catalog, plus narrowing of raw platform locale tags (`"es-MX"`,
//! `"en-GB"`) to the supported language set.
//!
//! ## Supported languages
//!
//! | Code | Language | Native name |
//! |------|----------|-------------|
//! | en   | English  | English     |
//! | es   | Spanish  | Español     |
//!
//! ## Design
//!
//! Translation keys use dotted namespaces: `"skill.welcome"`,
//! `"skill.error"`. Templates use positional `%s` placeholders. Unlike a
//! fail-open catalog, a missing key here is a hard error: a silently empty
//! utterance would reach the user's ears, so lookups fail loudly and the
//! dispatcher's error-handler chain turns the failure into a spoken
//! apology. Catalog completeness is checked once at startup by
//! [`catalog::validate`].
//!
//! The catalog is embedded at compile time as static data — no file I/O
//! and no shared mutable localization client. Each turn gets its own
//! [`Translator`] built from that turn's locale, so concurrent turns can
//! never observe each other's language.

pub mod catalog;
pub mod locale;

pub use catalog::{validate, Translator};
pub use locale::Lang;
