// SPDX-License-Identifier: PMPL-1.0-or-later

//! Space-fact data and random selection.
//!
//! The fact table is pure data: an ordered, non-empty list of fact strings
//! per supported language, loaded once at startup and immutable afterwards.
//! Selection is uniform over the resolved language's list, with the
//! randomness source injected behind [`RandomSource`] so tests can drive a
//! deterministic sequence.
//!
//! An empty per-language list is a configuration defect, not a runtime
//! condition: [`FactTable::validate`] fails fast at startup so a misloaded
//! table can never panic mid-turn.

use crate::i18n::Lang;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Source of uniformly distributed indices for fact selection.
///
/// Implementations must be shareable across concurrent turns. `len` is
/// always at least 1 when called through [`FactTable::pick`].
pub trait RandomSource: Send + Sync {
    /// Return an index in `0..len`.
    fn pick_index(&self, len: usize) -> usize;
}

/// OS-entropy randomness, the production source.
///
/// Draws 8 bytes per pick and rejection-samples to keep the modulo
/// reduction unbiased. If the OS entropy source fails (effectively never
/// outside exotic sandboxes) the pick degrades to index 0 instead of
/// aborting the turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        if len <= 1 {
            return 0;
        }
        let len = len as u64;
        let cap = u64::MAX - (u64::MAX % len);
        loop {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_err() {
                return 0;
            }
            let value = u64::from_le_bytes(buf);
            if value < cap {
                return (value % len) as usize;
            }
        }
    }
}

/// Deterministic randomness for tests: replays a fixed index sequence,
/// wrapping around when exhausted. Indices are clamped into range with a
/// modulo so a sequence written for one list length stays valid for
/// another.
#[derive(Debug)]
pub struct FixedSequence {
    indices: Vec<usize>,
    cursor: Mutex<usize>,
}

impl FixedSequence {
    pub fn new(indices: Vec<usize>) -> Self {
        assert!(!indices.is_empty(), "FixedSequence needs at least one index");
        FixedSequence {
            indices,
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for FixedSequence {
    fn pick_index(&self, len: usize) -> usize {
        let mut cursor = self.cursor.lock().expect("sequence cursor poisoned");
        let index = self.indices[*cursor % self.indices.len()];
        *cursor += 1;
        index % len
    }
}

/// Per-language fact lists. Process-wide, read-only after construction.
#[derive(Debug, Clone)]
pub struct FactTable {
    facts: HashMap<Lang, Vec<String>>,
}

impl FactTable {
    /// The built-in space-fact table shipped with the skill.
    pub fn builtin() -> FactTable {
        let mut facts = HashMap::new();
        facts.insert(
            Lang::En,
            EN_FACTS.iter().map(|s| s.to_string()).collect(),
        );
        facts.insert(
            Lang::Es,
            ES_FACTS.iter().map(|s| s.to_string()).collect(),
        );
        FactTable { facts }
    }

    /// Build a table from external data (e.g. deserialized configuration).
    /// Call [`FactTable::validate`] before serving traffic with it.
    pub fn new(facts: HashMap<Lang, Vec<String>>) -> FactTable {
        FactTable { facts }
    }

    /// Startup check: every supported language has a non-empty fact list.
    pub fn validate(&self) -> Result<()> {
        for lang in Lang::all() {
            match self.facts.get(lang) {
                None => bail!("fact table has no entry for language {lang}"),
                Some(list) if list.is_empty() => {
                    bail!("fact table entry for language {lang} is empty")
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Facts for a language, in table order. Empty slice only for a table
    /// that failed (or skipped) validation.
    pub fn facts_for(&self, lang: Lang) -> &[String] {
        self.facts.get(&lang).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Select one fact uniformly at random from the language's list.
    ///
    /// A single-entry list degenerates to always returning that entry.
    /// An empty list is an error here as a backstop, but the supported
    /// path is to reject it at startup via [`FactTable::validate`].
    pub fn pick(&self, lang: Lang, rng: &dyn RandomSource) -> Result<&str> {
        let list = self.facts_for(lang);
        if list.is_empty() {
            bail!("no facts available for language {lang}");
        }
        Ok(&list[rng.pick_index(list.len())])
    }
}

impl Default for FactTable {
    fn default() -> Self {
        FactTable::builtin()
    }
}

// ─── Built-in fact data ─────────────────────────────────────────────

const EN_FACTS: &[&str] = &[
    "The Moon is drifting away from Earth: Each year, the Moon moves about 3.8 cm away from Earth.",
    "A day on Venus is longer than a year on Venus.",
    "The largest known star is UY Scuti, with a radius 1700 times that of the Sun.",
    "On Jupiter and Saturn, it is believed that it rains diamonds.",
    "The universe is estimated to be over 93 billion light-years in diameter.",
    "The largest storm in the solar system is Jupiter's Great Red Spot.",
    "There are estimated to be more stars in the universe than grains of sand on all the Earth's beaches.",
    "Space contains particles of gas and dust, although in very small amounts.",
];

const ES_FACTS: &[&str] = &[
    "La Luna se está alejando de la Tierra: Cada año, la Luna se aleja de la Tierra unos 3.8 cm.",
    "Un día en Venus es más largo que un año en Venus.",
    "La estrella más grande conocida es UY Scuti, con un radio 1700 veces mayor que el del Sol.",
    "En Júpiter y Saturno, se cree que llueve diamantes.",
    "Se estima que el universo tiene más de 93 mil millones de años luz de diámetro.",
    "La tormenta más grande del sistema solar es la Gran Mancha Roja de Júpiter.",
    "Se estima que hay más estrellas en el universo que granos de arena en todas las playas de la Tierra.",
    "El espacio contiene partículas de gas y polvo, aunque en cantidades muy pequeñas.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_validates() {
        FactTable::builtin().validate().expect("built-in facts");
    }

    #[test]
    fn builtin_table_has_eight_facts_per_language() {
        let table = FactTable::builtin();
        assert_eq!(table.facts_for(Lang::En).len(), 8);
        assert_eq!(table.facts_for(Lang::Es).len(), 8);
    }

    #[test]
    fn missing_language_fails_validation() {
        let mut facts = HashMap::new();
        facts.insert(Lang::En, vec!["one".to_string()]);
        let err = FactTable::new(facts).validate().unwrap_err();
        assert!(err.to_string().contains("es"));
    }

    #[test]
    fn empty_list_fails_validation() {
        let mut facts = HashMap::new();
        facts.insert(Lang::En, vec!["one".to_string()]);
        facts.insert(Lang::Es, Vec::new());
        assert!(FactTable::new(facts).validate().is_err());
    }

    #[test]
    fn fixed_sequence_drives_selection() {
        let table = FactTable::builtin();
        let rng = FixedSequence::new(vec![0, 3, 7]);
        let list = table.facts_for(Lang::En);
        assert_eq!(table.pick(Lang::En, &rng).unwrap(), list[0]);
        assert_eq!(table.pick(Lang::En, &rng).unwrap(), list[3]);
        assert_eq!(table.pick(Lang::En, &rng).unwrap(), list[7]);
        // Sequence wraps.
        assert_eq!(table.pick(Lang::En, &rng).unwrap(), list[0]);
    }

    #[test]
    fn single_entry_list_always_returns_it() {
        let mut facts = HashMap::new();
        facts.insert(Lang::En, vec!["only".to_string()]);
        facts.insert(Lang::Es, vec!["único".to_string()]);
        let table = FactTable::new(facts);
        table.validate().unwrap();
        for _ in 0..16 {
            assert_eq!(table.pick(Lang::En, &OsRandom).unwrap(), "only");
        }
    }

    #[test]
    fn os_random_stays_in_range() {
        for _ in 0..256 {
            let index = OsRandom.pick_index(8);
            assert!(index < 8);
        }
    }
}
