//! Rule-based noun lemmatizer.
//!
//! Reduces plural English nouns to their dictionary form the way WordNet's
//! morphology does for the noun part of speech: irregular forms come from an
//! exception table, regular plurals go through suffix substitution. There is
//! no lexicon to validate candidates against, so the rules carry guards for
//! the common false positives (`glass`, `virus`, `crisis`, `was`).

/// Irregular plurals and their lemmas.
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("children", "child"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("feet", "foot"),
    ("firemen", "fireman"),
    ("geese", "goose"),
    ("halves", "half"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("loaves", "loaf"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("people", "person"),
    ("policemen", "policeman"),
    ("shelves", "shelf"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

/// Words ending in `s` that are already their own lemma.
const INVARIANT: &[&str] = &[
    "aids", "always", "chaos", "christmas", "clothes", "congress", "diabetes", "gas", "isis",
    "lens", "mathematics", "means", "measles", "news", "physics", "politics", "series", "species",
    "thanks", "this", "various",
];

/// Suffix substitutions tried in order after the exception table.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zzes", "zz"),
    ("s", ""),
];

/// Endings that look plural but are not.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// Shortest word the suffix rules touch.
const MIN_RULE_LEN: usize = 4;

/// Noun lemmatizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lemmatizer;

impl Lemmatizer {
    /// Create a new lemmatizer.
    pub fn new() -> Self {
        Self
    }

    /// Return the dictionary form of `word`.
    ///
    /// Matching is ASCII case-insensitive; characters before the replaced
    /// suffix keep their case. Words no rule applies to come back unchanged.
    pub fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_ascii_lowercase();

        if let Some((_, lemma)) = NOUN_EXCEPTIONS.iter().find(|(form, _)| *form == lower) {
            return (*lemma).to_string();
        }

        if lower.len() < MIN_RULE_LEN
            || INVARIANT.contains(&lower.as_str())
            || SINGULAR_ENDINGS.iter().any(|e| lower.ends_with(e))
        {
            return word.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            // `ies` on a four-letter word (`dies`, `ties`) is just `-s`.
            if *suffix == "ies" && lower.len() <= MIN_RULE_LEN {
                continue;
            }
            if lower.ends_with(suffix) {
                let stem = &word[..word.len() - suffix.len()];
                return format!("{stem}{replacement}");
            }
        }

        word.to_string()
    }
}
