//! Term-count vectorization driven by the message normalizer.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::estimator::Transformer;
use crate::features::sparse::SparseMatrix;
use crate::text::Normalizer;

/// Term → column mapping. Columns follow sorted term order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column of `term`, if it was seen during fitting.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term stored at `column`.
    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Counts normalized tokens per message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizer {
    normalizer: Normalizer,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            vocabulary: None,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The fitted vocabulary, `None` before `fit`.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    fn tokenize_all(&self, docs: &[String]) -> Vec<Vec<String>> {
        docs.par_iter()
            .map(|doc| self.normalizer.normalize(doc))
            .collect()
    }
}

impl Transformer for CountVectorizer {
    type Input = [String];
    type Output = SparseMatrix;

    fn fit(&mut self, docs: &[String]) -> Result<()> {
        if docs.is_empty() {
            return Err(TriageError::EmptyDataset);
        }

        let terms: BTreeSet<String> = self.tokenize_all(docs).into_iter().flatten().collect();
        let vocabulary = Vocabulary::from(terms.into_iter().collect::<Vec<_>>());
        tracing::debug!(documents = docs.len(), terms = vocabulary.len(), "fitted vocabulary");

        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    fn transform(&self, docs: &[String]) -> Result<SparseMatrix> {
        let vocabulary = self
            .vocabulary
            .as_ref()
            .ok_or(TriageError::NotFitted("CountVectorizer"))?;

        let mut matrix = SparseMatrix::new(vocabulary.len());
        for tokens in self.tokenize_all(docs) {
            let entries = tokens
                .iter()
                .filter_map(|t| vocabulary.get(t))
                .map(|col| (col, 1.0))
                .collect();
            matrix.push_row(entries)?;
        }
        Ok(matrix)
    }
}
