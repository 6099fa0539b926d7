//! # Message Normalizer
//!
//! Turns a raw message into the token sequence the vectorizer counts:
//! URLs are masked, the text is split into words, and every word is
//! lemmatized, lowercased and trimmed. The same normalizer must run at
//! training and inference time, so it is stored inside the model artifact
//! as its configuration and recompiled on load.

use std::borrow::Cow;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::text::lemmatizer::Lemmatizer;
use crate::text::tokenizer::WordTokenizer;

/// URL pattern used to detect links in messages.
pub const URL_PATTERN: &str =
    r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+";

/// Token every detected URL is replaced with.
pub const URL_PLACEHOLDER: &str = "urlplaceholder";

/// Serialized form of a [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Regex matching URL-like substrings.
    pub url_pattern: String,
    /// Replacement token for every URL match.
    pub placeholder: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            url_pattern: URL_PATTERN.to_string(),
            placeholder: URL_PLACEHOLDER.to_string(),
        }
    }
}

/// Message normalizer: URL masking, word tokenization and lemmatization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NormalizerConfig", into = "NormalizerConfig")]
pub struct Normalizer {
    config: NormalizerConfig,
    re_url: Regex,
    tokenizer: WordTokenizer,
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    /// Constructs a normalizer with the default URL pattern and placeholder.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::Regex` if the pattern fails to compile
    /// (should never happen with the static pattern defined here).
    pub fn new() -> Result<Self> {
        Self::with_config(NormalizerConfig::default())
    }

    /// Constructs a normalizer from an explicit configuration.
    pub fn with_config(config: NormalizerConfig) -> Result<Self> {
        let re_url = Regex::new(&config.url_pattern)?;
        Ok(Self {
            config,
            re_url,
            tokenizer: WordTokenizer::new(),
            lemmatizer: Lemmatizer::new(),
        })
    }

    /// The configuration this normalizer was built from.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Replace every URL-like substring with the placeholder token.
    pub fn mask_urls<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.re_url
            .replace_all(text, regex::NoExpand(&self.config.placeholder))
    }

    /// Normalize a message into its ordered token sequence.
    ///
    /// Duplicates, punctuation and placeholder tokens are all kept; term
    /// weighting downstream decides what matters.
    ///
    /// # Examples
    /// ```
    /// use triage_core::text::Normalizer;
    ///
    /// let normalizer = Normalizer::new().unwrap();
    /// let tokens = normalizer.normalize("Tents needed, see https://relief.example.org/map");
    /// assert_eq!(tokens, ["tent", "needed", ",", "see", "urlplaceholder"]);
    /// ```
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let masked = self.mask_urls(text);

        self.tokenizer
            .tokenize(&masked)
            .into_iter()
            .map(|token| {
                self.lemmatizer
                    .lemmatize(&token.text)
                    .to_lowercase()
                    .trim()
                    .to_string()
            })
            .collect()
    }
}

impl TryFrom<NormalizerConfig> for Normalizer {
    type Error = TriageError;

    fn try_from(config: NormalizerConfig) -> Result<Self> {
        Self::with_config(config)
    }
}

impl From<Normalizer> for NormalizerConfig {
    fn from(normalizer: Normalizer) -> Self {
        normalizer.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let normalizer = Normalizer::new().unwrap();
        let tokens = normalizer.normalize("We need Water and Blankets");
        assert_eq!(tokens, ["we", "need", "water", "and", "blanket"]);
    }

    #[test]
    fn test_urls_are_masked_before_tokenizing() {
        let normalizer = Normalizer::new().unwrap();
        let tokens =
            normalizer.normalize("Map at http://bit.ly/abc123 and https://x.org/a?b=1 now");

        assert_eq!(
            tokens,
            ["map", "at", "urlplaceholder", "and", "urlplaceholder", "now"]
        );
        assert!(!tokens.iter().any(|t| t.contains("http")));
    }

    #[test]
    fn test_mask_urls_keeps_surrounding_text() {
        let normalizer = Normalizer::new().unwrap();
        assert_eq!(
            normalizer.mask_urls("before http://a.b after"),
            "before urlplaceholder after"
        );
        assert_eq!(normalizer.mask_urls("no links here"), "no links here");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = Normalizer::new().unwrap();
        let text = "Is the Hurricane over? Call 555-0100 or visit http://help.example.com!!";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }

    #[test]
    fn test_keeps_duplicates_and_punctuation() {
        let normalizer = Normalizer::new().unwrap();
        let tokens = normalizer.normalize("help help !");
        assert_eq!(tokens, ["help", "help", "!"]);
    }

    #[test]
    fn test_empty_input() {
        let normalizer = Normalizer::new().unwrap();
        assert!(normalizer.normalize("").is_empty());
    }

    #[test]
    fn test_serializes_as_config() {
        let normalizer = Normalizer::new().unwrap();
        let json = serde_json::to_string(&normalizer).unwrap();
        assert!(json.contains("urlplaceholder"));

        let back: Normalizer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.config(), normalizer.config());
        assert_eq!(
            back.normalize("see http://x.y"),
            normalizer.normalize("see http://x.y")
        );
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let config = NormalizerConfig {
            url_pattern: "(".into(),
            placeholder: "x".into(),
        };
        assert!(matches!(
            Normalizer::with_config(config),
            Err(TriageError::Regex(_))
        ));
    }
}
