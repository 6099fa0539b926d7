//! Fit/transform/predict contracts shared by every pipeline stage.

use crate::data::LabelMatrix;
use crate::error::Result;
use crate::features::SparseMatrix;

/// A feature-extraction stage: learns state in `fit`, applies it in `transform`.
pub trait Transformer {
    /// What `fit` and `transform` consume.
    type Input: ?Sized;
    /// What `transform` produces.
    type Output;

    /// Learn the stage's state from `inputs`.
    fn fit(&mut self, inputs: &Self::Input) -> Result<()>;

    /// Apply the learned state. Fails with `NotFitted` before `fit`.
    fn transform(&self, inputs: &Self::Input) -> Result<Self::Output>;

    /// `fit` followed by `transform` on the same inputs.
    fn fit_transform(&mut self, inputs: &Self::Input) -> Result<Self::Output> {
        self.fit(inputs)?;
        self.transform(inputs)
    }
}

/// A single-label 0/1 classifier over sparse features.
pub trait BinaryClassifier: Send + Sync {
    /// Train on `features` with one 0/1 label per row.
    fn fit(&mut self, features: &SparseMatrix, labels: &[u8]) -> Result<()>;

    /// Predict one 0/1 label per row.
    fn predict(&self, features: &SparseMatrix) -> Result<Vec<u8>>;
}

/// A text-in, label-matrix-out estimator.
pub trait MultiLabelEstimator {
    /// Train on raw texts and their label rows.
    fn fit(&mut self, texts: &[String], labels: &LabelMatrix) -> Result<()>;

    /// Predict one label row per text.
    fn predict(&self, texts: &[String]) -> Result<LabelMatrix>;
}
