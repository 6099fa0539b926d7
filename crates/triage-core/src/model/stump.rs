//! Weighted depth-1 decision trees, the AdaBoost base learner.

use serde::{Deserialize, Serialize};

use crate::features::SparseRow;

/// Minimum impurity decrease for a split to be taken.
const MIN_GAIN: f64 = 1e-12;

/// The single test a stump performs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Feature column tested.
    pub feature: usize,
    /// Rows with a value above this go right.
    pub threshold: f64,
}

/// A depth-1 decision tree over non-negative sparse features.
///
/// Splits are chosen by weighted Gini impurity; each leaf predicts the
/// weighted majority class of the rows that reach it. A stump without a
/// split is a constant predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStump {
    split: Option<Split>,
    left: u8,
    right: u8,
}

/// Weighted Gini impurity of a node, scaled by the node's weight.
fn gini(pos: f64, neg: f64) -> f64 {
    let total = pos + neg;
    if total <= 0.0 {
        0.0
    } else {
        total - (pos * pos + neg * neg) / total
    }
}

fn majority(pos: f64, neg: f64) -> u8 {
    u8::from(pos > neg)
}

impl DecisionStump {
    /// A stump that always predicts `class`.
    pub fn constant(class: u8) -> Self {
        Self {
            split: None,
            left: class,
            right: class,
        }
    }

    pub fn split(&self) -> Option<Split> {
        self.split
    }

    /// Fit on pre-sorted feature columns (see `SparseMatrix::sorted_columns`).
    ///
    /// Only non-zero entries are stored per column; every other row sits at
    /// zero, below any candidate threshold. `labels` and `weights` are
    /// indexed by row.
    pub fn fit(columns: &[Vec<(f64, usize)>], labels: &[u8], weights: &[f64]) -> Self {
        let n_rows = labels.len();
        let (mut total_pos, mut total_neg) = (0.0, 0.0);
        for (&y, &w) in labels.iter().zip(weights) {
            if y == 1 {
                total_pos += w;
            } else {
                total_neg += w;
            }
        }

        let mut best_impurity = gini(total_pos, total_neg);
        let mut best: Option<(Split, f64, f64, f64, f64)> = None;

        for (feature, column) in columns.iter().enumerate() {
            let (mut right_pos, mut right_neg) = (0.0, 0.0);

            for k in (0..column.len()).rev() {
                let (value, row) = column[k];
                if labels[row] == 1 {
                    right_pos += weights[row];
                } else {
                    right_neg += weights[row];
                }

                // Cannot split between equal values, or below the smallest
                // value when no row is left at zero.
                let lower = match k {
                    0 if column.len() == n_rows => break,
                    0 => 0.0,
                    _ if column[k - 1].0 == value => continue,
                    _ => column[k - 1].0,
                };

                let left_pos = total_pos - right_pos;
                let left_neg = total_neg - right_neg;
                let impurity = gini(left_pos, left_neg) + gini(right_pos, right_neg);

                if impurity < best_impurity - MIN_GAIN {
                    best_impurity = impurity;
                    // Adjacent floats: the midpoint can round up to `value`.
                    let mut threshold = (lower + value) / 2.0;
                    if threshold >= value {
                        threshold = lower;
                    }
                    let split = Split { feature, threshold };
                    best = Some((split, left_pos, left_neg, right_pos, right_neg));
                }
            }
        }

        match best {
            Some((split, left_pos, left_neg, right_pos, right_neg)) => Self {
                split: Some(split),
                left: majority(left_pos, left_neg),
                right: majority(right_pos, right_neg),
            },
            None => Self::constant(majority(total_pos, total_neg)),
        }
    }

    /// Predict the class of one row.
    pub fn predict_row(&self, row: SparseRow<'_>) -> u8 {
        match self.split {
            Some(split) if row.get(split.feature) > split.threshold => self.right,
            _ => self.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SparseMatrix;

    fn uniform(n: usize) -> Vec<f64> {
        vec![1.0 / n as f64; n]
    }

    #[test]
    fn test_finds_separating_feature() {
        // feature 1 is present exactly on the positive rows
        let x = SparseMatrix::from_rows(
            vec![
                vec![(0, 0.9), (1, 0.7)],
                vec![(0, 0.5)],
                vec![(1, 0.2)],
                vec![(0, 0.3)],
            ],
            2,
        )
        .unwrap();
        let y = [1, 0, 1, 0];

        let stump = DecisionStump::fit(&x.sorted_columns(), &y, &uniform(4));
        let split = stump.split().unwrap();
        assert_eq!(split.feature, 1);
        assert!((split.threshold - 0.1).abs() < 1e-12);

        let preds: Vec<u8> = x.rows().map(|r| stump.predict_row(r)).collect();
        assert_eq!(preds, y);
    }

    #[test]
    fn test_single_class_is_constant() {
        let x = SparseMatrix::from_rows(vec![vec![(0, 1.0)], vec![]], 1).unwrap();
        let stump = DecisionStump::fit(&x.sorted_columns(), &[0, 0], &uniform(2));
        assert_eq!(stump.split(), None);
        assert_eq!(stump.predict_row(x.row(0)), 0);
    }

    #[test]
    fn test_weights_shift_the_majority() {
        let x = SparseMatrix::from_rows(vec![vec![], vec![], vec![]], 1).unwrap();
        let stump = DecisionStump::fit(&x.sorted_columns(), &[1, 0, 0], &[0.8, 0.1, 0.1]);
        assert_eq!(stump, DecisionStump::constant(1));
    }

    #[test]
    fn test_split_between_nonzero_values() {
        // every row has the feature; the split must sit between stored values
        let x = SparseMatrix::from_rows(
            vec![vec![(0, 0.1)], vec![(0, 0.2)], vec![(0, 0.8)], vec![(0, 0.9)]],
            1,
        )
        .unwrap();
        let y = [0, 0, 1, 1];

        let stump = DecisionStump::fit(&x.sorted_columns(), &y, &uniform(4));
        let split = stump.split().unwrap();
        assert!((split.threshold - 0.5).abs() < 1e-12);
        let preds: Vec<u8> = x.rows().map(|r| stump.predict_row(r)).collect();
        assert_eq!(preds, y);
    }

    #[test]
    fn test_split_between_adjacent_floats() {
        let a = f64::from_bits(0.5f64.to_bits() + 1);
        let b = f64::from_bits(a.to_bits() + 1);
        let x = SparseMatrix::from_rows(vec![vec![(0, a)], vec![(0, b)]], 1).unwrap();
        let y = [0, 1];

        let stump = DecisionStump::fit(&x.sorted_columns(), &y, &uniform(2));
        let split = stump.split().unwrap();
        assert!(split.threshold < b);
        let preds: Vec<u8> = x.rows().map(|r| stump.predict_row(r)).collect();
        assert_eq!(preds, y);
    }
}
