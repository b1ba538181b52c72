// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog for astrofact.
//!
//! Embeds all user-facing message templates for supported languages as
//! compile-time static tables. Lookup is O(n) on the key list per language,
//! which is fine for the handful of keys a skill carries — this runs once
//! or twice per turn, not in a hot loop.
//!
//! ## Adding a new language
//!
//! 1. Add a variant to [`Lang`](crate::i18n::Lang)
//! 2. Add the code mapping arms in `locale.rs`
//! 3. Create a `const XX: &[(&str, &str)]` table below
//! 4. Add `Lang::Xx => XX` to the match in `catalog_for()`
//! 5. `astrofact validate` (or [`validate`]) will refuse any table that
//!    does not define every key `EN` defines
//!
//! ## Adding a new key
//!
//! Add it to `EN` first, then to every other table. There is deliberately
//! no English fallback for individual keys: a key missing from a shipped
//! table is a configuration defect and [`validate`] catches it at startup.

use crate::i18n::Lang;
use anyhow::{anyhow, bail, Result};

// ─── Message keys ───────────────────────────────────────────────────

pub const WELCOME: &str = "skill.welcome";
pub const HELP: &str = "skill.help";
pub const GOODBYE: &str = "skill.goodbye";
pub const FALLBACK: &str = "skill.fallback";
pub const ERROR: &str = "skill.error";
pub const REPROMPT: &str = "skill.reprompt";
pub const FACT_REPROMPT: &str = "skill.fact_reprompt";
/// Parameterized: one `%s` placeholder for the intent identifier.
pub const REFLECT: &str = "skill.reflect";

// ─── Translator ─────────────────────────────────────────────────────

/// Per-turn translate function over the embedded catalog.
///
/// Built fresh for every request from that request's resolved [`Lang`] and
/// carried on the request context. Cheap to construct (a single enum), so
/// there is no reason to share one across turns — and sharing one would
/// reintroduce the cross-turn language bleed this design exists to prevent.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    lang: Lang,
}

impl Translator {
    pub fn new(lang: Lang) -> Self {
        Translator { lang }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Look up a message template verbatim.
    ///
    /// A missing key is a hard error, never an empty string or the key
    /// echoed back — either of those would surface as a broken utterance
    /// spoken to the user.
    pub fn text(&self, key: &str) -> Result<&'static str> {
        lookup(catalog_for(self.lang), key)
            .ok_or_else(|| anyhow!("missing catalog key {key:?} for language {}", self.lang))
    }

    /// Look up a template and substitute positional `%s` placeholders.
    ///
    /// # Examples
    ///
    /// ```
    /// use astrofact::i18n::{Lang, Translator};
    /// let t = Translator::new(Lang::En);
    /// let speech = t.format("skill.reflect", &["GetFactIntent"]).unwrap();
    /// assert_eq!(speech, "You just triggered GetFactIntent.");
    /// ```
    pub fn format(&self, key: &str, args: &[&str]) -> Result<String> {
        let template = self.text(key)?;
        let mut out = String::with_capacity(template.len());
        let mut remaining = args.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("%s") {
            out.push_str(&rest[..pos]);
            let arg = remaining.next().ok_or_else(|| {
                anyhow!(
                    "catalog key {key:?} ({}) expects more than {} argument(s)",
                    self.lang,
                    args.len()
                )
            })?;
            out.push_str(arg);
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Startup check: every language table defines every key `EN` defines.
///
/// English is the source language, so its key list is the schema. Run once
/// before serving traffic; a failure here means a shipped catalog is
/// incomplete and would produce request-time lookup errors.
pub fn validate() -> Result<()> {
    for lang in Lang::all() {
        let table = catalog_for(*lang);
        for &(key, _) in EN {
            if lookup(table, key).is_none() {
                bail!("catalog for language {lang} is missing key {key:?}");
            }
        }
        for &(key, value) in table {
            if value.is_empty() {
                bail!("catalog for language {lang} has empty template for key {key:?}");
            }
            if lookup(EN, key).is_none() {
                bail!("catalog for language {lang} defines unknown key {key:?}");
            }
        }
    }
    Ok(())
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    for &(k, v) in catalog {
        if k == key {
            return Some(v);
        }
    }
    None
}

fn catalog_for(lang: Lang) -> &'static [(&'static str, &'static str)] {
    match lang {
        Lang::En => EN,
        Lang::Es => ES,
    }
}

// ─── English (source language — all keys defined here) ──────────────

const EN: &[(&str, &str)] = &[
    (
        WELCOME,
        "Welcome, you can ask me for a fun fact about space. What would you like to know?",
    ),
    (
        HELP,
        "You can ask me for a fun fact about space by saying, give me a fun fact.",
    ),
    (GOODBYE, "Goodbye!"),
    (
        FALLBACK,
        "Sorry, I don't know about that. Please try again.",
    ),
    (
        ERROR,
        "Sorry, I had trouble doing what you asked. Please try again.",
    ),
    (REPROMPT, "How else can I help you?"),
    (FACT_REPROMPT, "Would you like to know another fact?"),
    (REFLECT, "You just triggered %s."),
];

// ─── Spanish ────────────────────────────────────────────────────────

const ES: &[(&str, &str)] = &[
    (
        WELCOME,
        "Bienvenido, puedes pedirme un dato curioso sobre el espacio. ¿Qué te gustaría saber?",
    ),
    (
        HELP,
        "Puedes pedirme un dato curioso sobre el espacio diciendo, dame un dato curioso.",
    ),
    (GOODBYE, "¡Adiós!"),
    (
        FALLBACK,
        "Lo siento, no sé sobre eso. Por favor intenta nuevamente.",
    ),
    (
        ERROR,
        "Lo siento, tuve problemas para hacer lo que pediste. Por favor, inténtalo de nuevo.",
    ),
    (REPROMPT, "¿En qué más puedo ayudarte?"),
    (FACT_REPROMPT, "¿Te gustaría saber algo más?"),
    (REFLECT, "Acabas de activar %s."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_complete() {
        validate().expect("built-in catalogs must define every key");
    }

    #[test]
    fn text_returns_exact_template() {
        let t = Translator::new(Lang::En);
        assert_eq!(
            t.text(GOODBYE).unwrap(),
            "Goodbye!",
        );
        let t = Translator::new(Lang::Es);
        assert_eq!(t.text(GOODBYE).unwrap(), "¡Adiós!");
    }

    #[test]
    fn missing_key_is_an_error_not_a_placeholder() {
        let t = Translator::new(Lang::Es);
        let err = t.text("skill.no_such_key").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("skill.no_such_key"), "got: {message}");
        assert!(message.contains("es"), "got: {message}");

        let err = t.format("skill.no_such_key", &["x"]).unwrap_err();
        assert!(err.to_string().contains("skill.no_such_key"));
    }

    #[test]
    fn format_substitutes_positional_args() {
        let t = Translator::new(Lang::En);
        assert_eq!(
            t.format(REFLECT, &["AMAZON.HelpIntent"]).unwrap(),
            "You just triggered AMAZON.HelpIntent.",
        );
        let t = Translator::new(Lang::Es);
        assert_eq!(
            t.format(REFLECT, &["GetFactIntent"]).unwrap(),
            "Acabas de activar GetFactIntent.",
        );
    }

    #[test]
    fn format_with_too_few_args_fails() {
        let t = Translator::new(Lang::En);
        assert!(t.format(REFLECT, &[]).is_err());
    }

    #[test]
    fn format_without_placeholders_ignores_args() {
        let t = Translator::new(Lang::En);
        assert_eq!(t.format(GOODBYE, &["spare"]).unwrap(), "Goodbye!");
    }
}
