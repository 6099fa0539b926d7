pub mod lemmatizer;
pub mod normalizer;
pub mod tokenizer;

pub use lemmatizer::Lemmatizer;
pub use normalizer::{Normalizer, NormalizerConfig, URL_PATTERN, URL_PLACEHOLDER};
pub use tokenizer::{Token, WordTokenizer};
