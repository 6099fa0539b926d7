//! Per-category precision/recall/F1 table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};
use crate::metrics::check_shapes;

/// Precision, recall, F1 and support of one label or one average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true positives plus false negatives.
    pub support: usize,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    ratio(2.0 * precision * recall, precision + recall)
}

impl LabelMetrics {
    fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp as f64, (tp + fp) as f64);
        let recall = ratio(tp as f64, (tp + fn_) as f64);
        Self {
            precision,
            recall,
            f1: f1(precision, recall),
            support: tp + fn_,
        }
    }
}

/// Classification report over every label column.
///
/// Undefined ratios (no predicted or no true positives) count as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub labels: Vec<(String, LabelMetrics)>,
    pub micro: LabelMetrics,
    pub macro_avg: LabelMetrics,
    pub weighted: LabelMetrics,
    pub samples: LabelMetrics,
}

impl ClassificationReport {
    pub fn new(truth: &LabelMatrix, predicted: &LabelMatrix, names: &[String]) -> Result<Self> {
        check_shapes(truth, predicted)?;
        if names.len() != truth.n_cols() {
            return Err(TriageError::DimensionMismatch {
                expected: truth.n_cols(),
                actual: names.len(),
            });
        }

        let n_cols = truth.n_cols();
        let mut tp = vec![0usize; n_cols];
        let mut fp = vec![0usize; n_cols];
        let mut fn_ = vec![0usize; n_cols];

        let mut sample_sums = (0.0, 0.0, 0.0);
        for (t_row, p_row) in truth.rows().zip(predicted.rows()) {
            let (mut hits, mut n_true, mut n_pred) = (0usize, 0usize, 0usize);
            for (col, (&t, &p)) in t_row.iter().zip(p_row).enumerate() {
                match (t, p) {
                    (1, 1) => tp[col] += 1,
                    (0, 1) => fp[col] += 1,
                    (1, 0) => fn_[col] += 1,
                    _ => {}
                }
                hits += usize::from(t == 1 && p == 1);
                n_true += usize::from(t == 1);
                n_pred += usize::from(p == 1);
            }
            let precision = ratio(hits as f64, n_pred as f64);
            let recall = ratio(hits as f64, n_true as f64);
            sample_sums.0 += precision;
            sample_sums.1 += recall;
            sample_sums.2 += ratio(2.0 * hits as f64, (n_true + n_pred) as f64);
        }

        let labels: Vec<(String, LabelMetrics)> = names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                (
                    name.clone(),
                    LabelMetrics::from_counts(tp[col], fp[col], fn_[col]),
                )
            })
            .collect();

        let total_support: usize = labels.iter().map(|(_, m)| m.support).sum();

        let micro = LabelMetrics::from_counts(
            tp.iter().sum(),
            fp.iter().sum(),
            fn_.iter().sum(),
        );

        let k = n_cols.max(1) as f64;
        let macro_avg = LabelMetrics {
            precision: labels.iter().map(|(_, m)| m.precision).sum::<f64>() / k,
            recall: labels.iter().map(|(_, m)| m.recall).sum::<f64>() / k,
            f1: labels.iter().map(|(_, m)| m.f1).sum::<f64>() / k,
            support: total_support,
        };

        let weight = |m: &LabelMetrics, v: f64| v * m.support as f64;
        let ts = total_support as f64;
        let weighted = LabelMetrics {
            precision: ratio(labels.iter().map(|(_, m)| weight(m, m.precision)).sum(), ts),
            recall: ratio(labels.iter().map(|(_, m)| weight(m, m.recall)).sum(), ts),
            f1: ratio(labels.iter().map(|(_, m)| weight(m, m.f1)).sum(), ts),
            support: total_support,
        };

        let n = truth.n_rows() as f64;
        let samples = LabelMetrics {
            precision: ratio(sample_sums.0, n),
            recall: ratio(sample_sums.1, n),
            f1: ratio(sample_sums.2, n),
            support: total_support,
        };

        Ok(Self {
            labels,
            micro,
            macro_avg,
            weighted,
            samples,
        })
    }

    /// Metrics for the label called `name`.
    pub fn label(&self, name: &str) -> Option<&LabelMetrics> {
        self.labels.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LAST: &str = "weighted avg";
        let width = self
            .labels
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(LAST.len());

        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &LabelMetrics| {
            writeln!(
                f,
                "{name:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.precision, m.recall, m.f1, m.support
            )
        };

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, m) in &self.labels {
            row(f, name, m)?;
        }
        writeln!(f)?;
        row(f, "micro avg", &self.micro)?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, LAST, &self.weighted)?;
        row(f, "samples avg", &self.samples)
    }
}
