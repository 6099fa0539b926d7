//! # Word Tokenizer
//!
//! Splits free-text messages into word tokens on Unicode word boundaries
//! (UAX #29). Whitespace is dropped, punctuation is kept as separate tokens
//! and English clitics are split off the way the Penn Treebank does it
//! (`don't` becomes `do` + `n't`).

use unicode_segmentation::UnicodeSegmentation;

/// A token extracted from a message with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, exactly as it appears in the input
    pub text: String,
    /// Start byte offset in the original string
    pub start: usize,
    /// End byte offset in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Clitic suffixes split off a word, longest first.
const CLITICS: &[&str] = &["n't", "'ll", "'re", "'ve", "'s", "'m", "'d"];

/// Unicode-aware word tokenizer.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new tokenizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Tokenize a message into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use triage_core::text::WordTokenizer;
    ///
    /// let tokenizer = WordTokenizer::new();
    /// let tokens = tokenizer.tokenize("We need water, please!");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["We", "need", "water", ",", "please", "!"]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for (start, segment) in input.split_word_bound_indices() {
            if segment.chars().all(char::is_whitespace) {
                continue;
            }

            let (head, clitic) = split_clitic(segment);
            if !head.is_empty() {
                push(&mut tokens, head, start);
            }
            if let Some(clitic) = clitic {
                push(&mut tokens, clitic, start + head.len());
            }
        }

        tokens
    }

    /// Tokenize and keep only the token texts.
    pub fn words(&self, input: &str) -> Vec<String> {
        self.tokenize(input).into_iter().map(|t| t.text).collect()
    }
}

fn push(tokens: &mut Vec<Token>, text: &str, start: usize) {
    let index = tokens.len();
    tokens.push(Token {
        text: text.to_string(),
        start,
        end: start + text.len(),
        index,
    });
}

/// Split a trailing clitic off a word segment, if it carries one.
///
/// Curly apostrophes are matched as well as straight ones.
fn split_clitic(segment: &str) -> (&str, Option<&str>) {
    let folded: String = segment
        .chars()
        .map(|c| if c == '\u{2019}' { '\'' } else { c.to_ascii_lowercase() })
        .collect();

    for clitic in CLITICS {
        if folded.len() > clitic.len() && folded.ends_with(clitic) {
            // Folding only swaps one 3-byte char for a 1-byte one, so count
            // chars to find the split point in the original segment.
            let clitic_chars = clitic.chars().count();
            let split = segment
                .char_indices()
                .rev()
                .nth(clitic_chars - 1)
                .map(|(i, _)| i)
                .unwrap_or(0);
            if split == 0 {
                return (segment, None);
            }
            return (&segment[..split], Some(&segment[split..]));
        }
    }

    (segment, None)
}
