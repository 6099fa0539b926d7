//! One independent binary classifier per label column.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};
use crate::estimator::BinaryClassifier;
use crate::features::SparseMatrix;

/// Fits a clone of `template` to each label column and stacks their predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiOutputClassifier<C> {
    template: C,
    estimators: Vec<C>,
}

impl<C: BinaryClassifier + Clone> MultiOutputClassifier<C> {
    pub fn new(template: C) -> Self {
        Self {
            template,
            estimators: Vec::new(),
        }
    }

    /// The unfitted classifier cloned for every column.
    pub fn template(&self) -> &C {
        &self.template
    }

    /// Fitted classifiers, in label-column order.
    pub fn estimators(&self) -> &[C] {
        &self.estimators
    }

    /// Number of label columns learned, zero before `fit`.
    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    pub fn fit(&mut self, features: &SparseMatrix, labels: &LabelMatrix) -> Result<()> {
        if features.n_rows() != labels.n_rows() {
            return Err(TriageError::DimensionMismatch {
                expected: features.n_rows(),
                actual: labels.n_rows(),
            });
        }
        if labels.n_cols() == 0 {
            return Err(TriageError::InvalidConfig("no label columns to fit".into()));
        }

        self.estimators = (0..labels.n_cols())
            .into_par_iter()
            .map(|col| {
                let mut clf = self.template.clone();
                clf.fit(features, &labels.column(col))?;
                Ok(clf)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    pub fn predict(&self, features: &SparseMatrix) -> Result<LabelMatrix> {
        if self.estimators.is_empty() {
            return Err(TriageError::NotFitted("MultiOutputClassifier"));
        }
        let columns = self
            .estimators
            .iter()
            .map(|clf| clf.predict(features))
            .collect::<Result<Vec<_>>>()?;
        LabelMatrix::from_columns(&columns, features.n_rows())
    }
}
