//! Inverse-document-frequency reweighting of term counts.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::estimator::Transformer;
use crate::features::sparse::SparseMatrix;

/// TF-IDF reweighting of a count matrix.
///
/// With `smooth_idf` (the default) every term behaves as if it appeared in
/// one extra document: `idf = ln((1 + n) / (1 + df)) + 1`. Without it,
/// `idf = ln(n / df) + 1`. Rows are L2-normalized after weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfTransformer {
    smooth_idf: bool,
    sublinear_tf: bool,
    idf: Option<Vec<f64>>,
}

impl Default for TfidfTransformer {
    fn default() -> Self {
        Self {
            smooth_idf: true,
            sublinear_tf: false,
            idf: None,
        }
    }
}

impl TfidfTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable IDF smoothing.
    pub fn with_smooth_idf(mut self, enabled: bool) -> Self {
        self.smooth_idf = enabled;
        self
    }

    /// Replace raw counts with `1 + ln(tf)`.
    pub fn with_sublinear_tf(mut self, enabled: bool) -> Self {
        self.sublinear_tf = enabled;
        self
    }

    pub fn smooth_idf(&self) -> bool {
        self.smooth_idf
    }

    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    /// Same settings, learned weights dropped.
    pub fn unfitted(&self) -> Self {
        Self {
            smooth_idf: self.smooth_idf,
            sublinear_tf: self.sublinear_tf,
            idf: None,
        }
    }

    /// Learned IDF weights, one per vocabulary column.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }
}

impl Transformer for TfidfTransformer {
    type Input = SparseMatrix;
    type Output = SparseMatrix;

    fn fit(&mut self, counts: &SparseMatrix) -> Result<()> {
        let n = counts.n_rows() as f64;
        if counts.n_rows() == 0 {
            return Err(TriageError::EmptyDataset);
        }

        let mut df = vec![0usize; counts.n_cols()];
        for row in counts.rows() {
            for &col in row.indices {
                df[col] += 1;
            }
        }

        let idf = df
            .into_iter()
            .map(|df| {
                let df = df as f64;
                if self.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else if df > 0.0 {
                    (n / df).ln() + 1.0
                } else {
                    // Never-seen column; it can only ever hold zeros.
                    1.0
                }
            })
            .collect();

        self.idf = Some(idf);
        Ok(())
    }

    fn transform(&self, counts: &SparseMatrix) -> Result<SparseMatrix> {
        let idf = self
            .idf
            .as_ref()
            .ok_or(TriageError::NotFitted("TfidfTransformer"))?;
        if counts.n_cols() != idf.len() {
            return Err(TriageError::DimensionMismatch {
                expected: idf.len(),
                actual: counts.n_cols(),
            });
        }

        let sublinear = self.sublinear_tf;
        let mut weighted = counts.map_values(|col, tf| {
            let tf = if sublinear { 1.0 + tf.ln() } else { tf };
            tf * idf[col]
        });
        weighted.normalize_rows_l2();
        Ok(weighted)
    }
}
