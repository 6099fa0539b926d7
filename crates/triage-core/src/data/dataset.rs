use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Name of the category column that may carry the sentinel value.
pub const RELATED: &str = "related";

/// Extra value the `related` column may hold besides 0 and 1.
pub const RELATED_SENTINEL: u8 = 2;

/// One labeled message as stored by the ETL step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Row id.
    pub id: i64,
    /// English message text (what the classifier sees).
    pub message: String,
    /// Message in its original language, when it was translated.
    pub original: Option<String>,
    /// Source channel (`direct`, `news`, `social`, ...).
    pub genre: String,
    /// Raw category values, aligned with [`Dataset::category_names`].
    pub categories: Vec<u8>,
}

/// How the `related` sentinel is folded into a binary label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelPolicy {
    /// Treat the sentinel as related (`2 -> 1`).
    #[default]
    Positive,
    /// Treat the sentinel as unrelated (`2 -> 0`).
    Negative,
}

impl SentinelPolicy {
    /// Map a raw stored value to a binary label.
    #[must_use]
    pub fn binarize(self, value: u8) -> u8 {
        match (self, value) {
            (_, 0) => 0,
            (_, 1) => 1,
            (Self::Positive, _) => 1,
            (Self::Negative, _) => 0,
        }
    }
}

impl fmt::Display for SentinelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for SentinelPolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(TriageError::InvalidConfig(format!(
                "unknown sentinel policy {other:?} (expected positive or negative)"
            ))),
        }
    }
}

/// Dense row-major matrix of binary labels, one column per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<u8>,
}

impl LabelMatrix {
    /// An empty matrix with `n_cols` columns.
    #[must_use]
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_rows: 0,
            n_cols,
            data: Vec::new(),
        }
    }

    /// An all-zero matrix.
    #[must_use]
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0; n_rows * n_cols],
        }
    }

    /// Build a matrix from rows that must all be `n_cols` wide.
    pub fn from_rows(rows: Vec<Vec<u8>>, n_cols: usize) -> Result<Self> {
        let mut matrix = Self::new(n_cols);
        for row in rows {
            matrix.push_row(&row)?;
        }
        Ok(matrix)
    }

    /// Build a matrix from per-label columns of equal length.
    pub fn from_columns(columns: &[Vec<u8>], n_rows: usize) -> Result<Self> {
        let mut matrix = Self::zeros(n_rows, columns.len());
        for (j, column) in columns.iter().enumerate() {
            if column.len() != n_rows {
                return Err(TriageError::DimensionMismatch {
                    expected: n_rows,
                    actual: column.len(),
                });
            }
            for (i, &value) in column.iter().enumerate() {
                matrix.data[i * matrix.n_cols + j] = value;
            }
        }
        Ok(matrix)
    }

    /// Append a row.
    pub fn push_row(&mut self, row: &[u8]) -> Result<()> {
        if row.len() != self.n_cols {
            return Err(TriageError::DimensionMismatch {
                expected: self.n_cols,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        self.n_rows += 1;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.n_cols + col]
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// Copy out one label column.
    pub fn column(&self, col: usize) -> Vec<u8> {
        (0..self.n_rows).map(|i| self.get(i, col)).collect()
    }

    /// New matrix holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            n_rows: indices.len(),
            n_cols: self.n_cols,
            data,
        }
    }
}

/// The labeled message table, loaded once and then read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    category_names: Vec<String>,
    records: Vec<MessageRecord>,
}

impl Dataset {
    /// Builds a dataset, checking every record carries one value per category.
    pub fn new(category_names: Vec<String>, records: Vec<MessageRecord>) -> Result<Self> {
        if let Some(bad) = records
            .iter()
            .find(|r| r.categories.len() != category_names.len())
        {
            return Err(TriageError::DimensionMismatch {
                expected: category_names.len(),
                actual: bad.categories.len(),
            });
        }

        Ok(Self {
            category_names,
            records,
        })
    }

    /// Category column names in table order.
    pub fn category_names(&self) -> &[String] {
        &self.category_names
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a category column, if present.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.category_names.iter().position(|c| c == name)
    }

    /// Message texts in row order.
    pub fn messages(&self) -> Vec<String> {
        self.records.iter().map(|r| r.message.clone()).collect()
    }

    /// Binary label matrix aligned with [`Dataset::messages`].
    pub fn labels(&self, policy: SentinelPolicy) -> LabelMatrix {
        let n_cols = self.category_names.len();
        let mut data = Vec::with_capacity(self.records.len() * n_cols);
        for record in &self.records {
            data.extend(record.categories.iter().map(|&v| policy.binarize(v)));
        }
        LabelMatrix {
            n_rows: self.records.len(),
            n_cols,
            data,
        }
    }

    /// Split into `(texts, labels, category names)` for training.
    pub fn to_training_data(
        &self,
        policy: SentinelPolicy,
    ) -> (Vec<String>, LabelMatrix, Vec<String>) {
        (
            self.messages(),
            self.labels(policy),
            self.category_names.clone(),
        )
    }
}
