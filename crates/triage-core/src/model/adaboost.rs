//! Discrete AdaBoost (SAMME, two classes) over decision stumps.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::estimator::BinaryClassifier;
use crate::features::SparseMatrix;
use crate::model::stump::DecisionStump;

/// Boosting hyperparameters. These are the values a grid search varies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaBoostParams {
    /// Shrinks each estimator's vote.
    pub learning_rate: f64,
    /// Upper bound on boosting rounds. Training may stop earlier.
    pub n_estimators: usize,
}

impl Default for AdaBoostParams {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            n_estimators: 50,
        }
    }
}

impl AdaBoostParams {
    pub fn new(learning_rate: f64, n_estimators: usize) -> Self {
        Self {
            learning_rate,
            n_estimators,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TriageError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.n_estimators == 0 {
            return Err(TriageError::InvalidConfig(
                "n_estimators must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for AdaBoostParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "learning_rate={}, n_estimators={}",
            self.learning_rate, self.n_estimators
        )
    }
}

/// Boosted ensemble of weighted stumps for one 0/1 label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostClassifier {
    params: AdaBoostParams,
    n_features: usize,
    estimators: Vec<DecisionStump>,
    estimator_weights: Vec<f64>,
}

impl Default for AdaBoostClassifier {
    fn default() -> Self {
        Self::new(AdaBoostParams::default())
    }
}

impl AdaBoostClassifier {
    pub fn new(params: AdaBoostParams) -> Self {
        Self {
            params,
            n_features: 0,
            estimators: Vec::new(),
            estimator_weights: Vec::new(),
        }
    }

    pub fn params(&self) -> AdaBoostParams {
        self.params
    }

    pub fn is_fitted(&self) -> bool {
        !self.estimators.is_empty()
    }

    /// Stumps actually kept, which may be fewer than `n_estimators`.
    pub fn estimators(&self) -> &[DecisionStump] {
        &self.estimators
    }

    pub fn estimator_weights(&self) -> &[f64] {
        &self.estimator_weights
    }

    fn push(&mut self, stump: DecisionStump, weight: f64) {
        self.estimators.push(stump);
        self.estimator_weights.push(weight);
    }

    /// Weighted vote for class 1 minus the vote for class 0.
    fn decision(&self, features: &SparseMatrix, row: usize) -> f64 {
        let row = features.row(row);
        self.estimators
            .iter()
            .zip(&self.estimator_weights)
            .map(|(stump, &alpha)| {
                if stump.predict_row(row) == 1 {
                    alpha
                } else {
                    -alpha
                }
            })
            .sum()
    }
}

impl BinaryClassifier for AdaBoostClassifier {
    fn fit(&mut self, features: &SparseMatrix, labels: &[u8]) -> Result<()> {
        self.params.validate()?;
        let n = features.n_rows();
        if n == 0 {
            return Err(TriageError::EmptyDataset);
        }
        if labels.len() != n {
            return Err(TriageError::DimensionMismatch {
                expected: n,
                actual: labels.len(),
            });
        }

        self.n_features = features.n_cols();
        self.estimators.clear();
        self.estimator_weights.clear();

        if labels.iter().all(|&y| y == labels[0]) {
            self.push(DecisionStump::constant(labels[0]), 1.0);
            return Ok(());
        }

        let columns = features.sorted_columns();
        let mut weights = vec![1.0 / n as f64; n];

        for round in 0..self.params.n_estimators {
            let stump = DecisionStump::fit(&columns, labels, &weights);
            let missed: Vec<bool> = (0..n)
                .map(|i| stump.predict_row(features.row(i)) != labels[i])
                .collect();

            let total: f64 = weights.iter().sum();
            let error = missed
                .iter()
                .zip(&weights)
                .filter(|(m, _)| **m)
                .map(|(_, w)| w)
                .sum::<f64>()
                / total;

            if error <= 0.0 {
                self.push(stump, 1.0);
                break;
            }
            if error >= 0.5 {
                // No better than chance. Keep it only if nothing else exists.
                if self.estimators.is_empty() {
                    self.push(stump, 1.0);
                }
                break;
            }

            let alpha = self.params.learning_rate * ((1.0 - error) / error).ln();
            self.push(stump, alpha);

            if round + 1 == self.params.n_estimators {
                break;
            }

            for (w, &m) in weights.iter_mut().zip(&missed) {
                if m {
                    *w *= alpha.exp();
                }
            }
            let sum: f64 = weights.iter().sum();
            if !sum.is_finite() || sum <= 0.0 {
                tracing::debug!(round, "sample weights degenerated; stopping early");
                break;
            }
            for w in &mut weights {
                *w /= sum;
            }
        }

        Ok(())
    }

    fn predict(&self, features: &SparseMatrix) -> Result<Vec<u8>> {
        if !self.is_fitted() {
            return Err(TriageError::NotFitted("AdaBoostClassifier"));
        }
        if features.n_cols() != self.n_features {
            return Err(TriageError::DimensionMismatch {
                expected: self.n_features,
                actual: features.n_cols(),
            });
        }

        Ok((0..features.n_rows())
            .map(|i| u8::from(self.decision(features, i) > 0.0))
            .collect())
    }
}
