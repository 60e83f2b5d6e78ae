//! Noun lemmatizer in the style of WordNet's morphy.
//!
//! Without a dictionary to validate candidates against, irregular plurals are
//! resolved through a fixed exception table and regular plurals through
//! ordered suffix detachment rules. Every token is treated as a noun.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
};

/// Words at or below this length are never rewritten ("gas", "bus", "yes").
const MIN_LEMMA_INPUT: usize = 3;

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "datum"),
    ("media", "medium"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("cacti", "cactus"),
    ("fungi", "fungus"),
    ("stimuli", "stimulus"),
    ("alumni", "alumnus"),
    ("bacteria", "bacterium"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("lenses", "lens"),
    ("atlases", "atlas"),
    ("canvases", "canvas"),
    ("bonuses", "bonus"),
    ("viruses", "virus"),
    ("campuses", "campus"),
    ("statuses", "status"),
    ("choruses", "chorus"),
];

/// Nouns spelled the same in singular and plural.
const INVARIANT_NOUNS: &[&str] = &[
    "species",
    "series",
    "news",
    "means",
    "physics",
    "mathematics",
    "economics",
    "politics",
    "headquarters",
];

/// Suffix rules, most specific first. `min_len` guards against stripping
/// short words whose ending only looks like a plural. There is no general
/// `ses -> s` rule: without a dictionary it would turn "cases" into "cas", so
/// `-s` nouns with an `-es` plural live in the exception table.
const DETACHMENT_RULES: &[DetachmentRule] = &[
    DetachmentRule::new("ies", "y", 5),
    DetachmentRule::new("sses", "ss", 5),
    DetachmentRule::new("ches", "ch", 5),
    DetachmentRule::new("shes", "sh", 5),
    DetachmentRule::new("xes", "x", 4),
    DetachmentRule::new("zes", "z", 5),
];

/// Singular endings that must not lose their final `s`.
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

struct DetachmentRule {
    suffix: &'static str,
    replacement: &'static str,
    min_len: usize,
}

impl DetachmentRule {
    const fn new(suffix: &'static str, replacement: &'static str, min_len: usize) -> Self {
        Self {
            suffix,
            replacement,
            min_len,
        }
    }

    fn apply(&self, word: &str) -> Option<String> {
        if word.len() < self.min_len {
            return None;
        }
        word.strip_suffix(self.suffix)
            .map(|stem| format!("{stem}{}", self.replacement))
    }
}

pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
}

impl Lemmatizer {
    pub fn english() -> Self {
        Self {
            exceptions: NOUN_EXCEPTIONS.iter().copied().collect(),
            invariant: INVARIANT_NOUNS.iter().copied().collect(),
        }
    }

    /// Reduce `word` (already lowercase) to its noun base form.
    pub fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(lemma) = self.exceptions.get(word) {
            return Cow::Borrowed(*lemma);
        }
        if word.len() <= MIN_LEMMA_INPUT || self.invariant.contains(word) {
            return Cow::Borrowed(word);
        }
        if let Some(lemma) = DETACHMENT_RULES.iter().find_map(|rule| rule.apply(word)) {
            return Cow::Owned(lemma);
        }
        if PROTECTED_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
            return Cow::Borrowed(word);
        }
        match word.strip_suffix('s') {
            Some(stem) => Cow::Borrowed(stem),
            None => Cow::Borrowed(word),
        }
    }
}
