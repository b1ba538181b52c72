// SPDX-License-Identifier: PMPL-1.0-or-later

//! Supported-language narrowing for raw platform locale tags.
//!
//! Platforms send full BCP 47-ish tags (`"es-MX"`, `"en-GB"`, sometimes
//! just `"es"`). The skill only maintains catalogs per language, so tags
//! are narrowed by language prefix. Unrecognised tags fall back to English
//! rather than erroring; the platform has already accepted the session and
//! answering in the default language beats refusing to answer at all.

use serde::{Deserialize, Serialize};

/// Supported output languages for skill responses.
///
/// Each variant maps to an ISO 639-1 two-letter code. Narrowed from the
/// request's locale tag once per turn; everything downstream (catalog
/// lookups, fact selection) keys off this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Es,
}

impl Lang {
    /// ISO 639-1 two-letter code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Es => "es",
        }
    }

    /// Narrow a raw locale tag to a supported language.
    ///
    /// Matches on the language prefix, so `"es"`, `"es-ES"` and `"es-MX"`
    /// all resolve to [`Lang::Es`]. Tags that match no supported language
    /// resolve to [`Lang::En`].
    ///
    /// # Examples
    ///
    /// ```
    /// use astrofact::i18n::Lang;
    /// assert_eq!(Lang::from_tag("es-MX"), Lang::Es);
    /// assert_eq!(Lang::from_tag("en-GB"), Lang::En);
    /// assert_eq!(Lang::from_tag("fr-FR"), Lang::En);
    /// ```
    pub fn from_tag(tag: &str) -> Lang {
        if tag.starts_with("es") {
            Lang::Es
        } else if tag.starts_with("en") {
            Lang::En
        } else {
            // Unrecognised language: silent English default, matching the
            // platform skill's long-standing behavior.
            Lang::En
        }
    }

    /// All supported languages, in display order.
    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::Es]
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::En
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
