//! Scoring functions for multi-label predictions.

mod report;

pub use report::{ClassificationReport, LabelMetrics};

use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};

/// How grid-search candidates are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Fraction of rows whose whole label vector is correct.
    #[default]
    SubsetAccuracy,
    /// Fraction of individual label cells that are correct.
    HammingAccuracy,
}

impl Scoring {
    pub fn score(self, truth: &LabelMatrix, predicted: &LabelMatrix) -> Result<f64> {
        match self {
            Scoring::SubsetAccuracy => subset_accuracy(truth, predicted),
            Scoring::HammingAccuracy => hamming_accuracy(truth, predicted),
        }
    }
}

impl std::fmt::Display for Scoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Scoring::SubsetAccuracy => "subset_accuracy",
            Scoring::HammingAccuracy => "hamming_accuracy",
        })
    }
}

impl std::str::FromStr for Scoring {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subset_accuracy" | "subset" => Ok(Scoring::SubsetAccuracy),
            "hamming_accuracy" | "hamming" => Ok(Scoring::HammingAccuracy),
            other => Err(TriageError::InvalidConfig(format!(
                "unknown scoring '{other}'"
            ))),
        }
    }
}

pub(crate) fn check_shapes(truth: &LabelMatrix, predicted: &LabelMatrix) -> Result<()> {
    if truth.n_rows() != predicted.n_rows() {
        return Err(TriageError::DimensionMismatch {
            expected: truth.n_rows(),
            actual: predicted.n_rows(),
        });
    }
    if truth.n_cols() != predicted.n_cols() {
        return Err(TriageError::DimensionMismatch {
            expected: truth.n_cols(),
            actual: predicted.n_cols(),
        });
    }
    Ok(())
}

/// Exact-match ratio. Zero for an empty matrix.
pub fn subset_accuracy(truth: &LabelMatrix, predicted: &LabelMatrix) -> Result<f64> {
    check_shapes(truth, predicted)?;
    if truth.n_rows() == 0 {
        return Ok(0.0);
    }
    let exact = truth
        .rows()
        .zip(predicted.rows())
        .filter(|(t, p)| t == p)
        .count();
    Ok(exact as f64 / truth.n_rows() as f64)
}

/// One minus the Hamming loss. Zero for an empty matrix.
pub fn hamming_accuracy(truth: &LabelMatrix, predicted: &LabelMatrix) -> Result<f64> {
    check_shapes(truth, predicted)?;
    let cells = truth.n_rows() * truth.n_cols();
    if cells == 0 {
        return Ok(0.0);
    }
    let correct: usize = truth
        .rows()
        .zip(predicted.rows())
        .map(|(t, p)| t.iter().zip(p).filter(|(a, b)| a == b).count())
        .sum();
    Ok(correct as f64 / cells as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrices() -> (LabelMatrix, LabelMatrix) {
        let truth = LabelMatrix::from_rows(vec![vec![1, 0], vec![0, 1], vec![1, 1]], 2).unwrap();
        let pred = LabelMatrix::from_rows(vec![vec![1, 0], vec![0, 0], vec![1, 1]], 2).unwrap();
        (truth, pred)
    }

    #[test]
    fn test_subset_accuracy() {
        let (truth, pred) = matrices();
        let score = subset_accuracy(&truth, &pred).unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_hamming_accuracy() {
        let (truth, pred) = matrices();
        let score = Scoring::HammingAccuracy.score(&truth, &pred).unwrap();
        assert!((score - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let (truth, _) = matrices();
        let other = LabelMatrix::zeros(3, 3);
        assert!(subset_accuracy(&truth, &other).is_err());
    }

    #[test]
    fn test_scoring_names() {
        assert_eq!(Scoring::default(), Scoring::SubsetAccuracy);
        assert_eq!("hamming".parse::<Scoring>().unwrap(), Scoring::HammingAccuracy);
        assert_eq!(Scoring::SubsetAccuracy.to_string(), "subset_accuracy");
        assert!("f1".parse::<Scoring>().is_err());
    }
}
