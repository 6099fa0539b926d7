//! Loading the training table and splitting it for evaluation.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use triage_core::{LabelMatrix, SentinelPolicy, load_dataset};

/// Texts, labels and category names ready for fitting.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub texts: Vec<String>,
    pub labels: LabelMatrix,
    pub category_names: Vec<String>,
}

impl TrainingData {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> (Vec<String>, LabelMatrix) {
        let texts = indices.iter().map(|&i| self.texts[i].clone()).collect();
        (texts, self.labels.select_rows(indices))
    }
}

/// Load messages and binarized labels from `table` in the SQLite file at `path`.
pub fn load_data<P: AsRef<Path>>(
    path: P,
    table: &str,
    policy: SentinelPolicy,
) -> anyhow::Result<TrainingData> {
    let path = path.as_ref();
    let dataset = load_dataset(path, table)
        .with_context(|| format!("failed to load table '{table}' from {}", path.display()))?;
    if dataset.is_empty() {
        anyhow::bail!("table '{table}' in {} has no rows", path.display());
    }

    let (texts, labels, category_names) = dataset.to_training_data(policy);
    Ok(TrainingData {
        texts,
        labels,
        category_names,
    })
}

/// Train/test row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Shuffle `0..n` and hold out `ceil(test_size * n)` rows for testing.
///
/// Without a seed the shuffle is seeded from the clock.
pub fn train_test_split(
    n: usize,
    test_size: f64,
    seed: Option<u64>,
) -> anyhow::Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        anyhow::bail!("test size must be between 0 and 1, got {test_size}");
    }
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        anyhow::bail!("cannot hold out {n_test} of {n} rows for testing");
    }

    let seed = seed.unwrap_or_else(clock_seed);
    let mut rng = oorandom::Rand64::new(u128::from(seed));

    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.rand_range(0..(i as u64 + 1)) as usize;
        indices.swap(i, j);
    }

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(10, 0.2, Some(7)).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        // ceil rounding
        let split = train_test_split(11, 0.2, Some(7)).unwrap();
        assert_eq!(split.test.len(), 3);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        let a = train_test_split(50, 0.2, Some(42)).unwrap();
        let b = train_test_split(50, 0.2, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_rejects_degenerate_sizes() {
        assert!(train_test_split(10, 0.0, None).is_err());
        assert!(train_test_split(10, 1.5, None).is_err());
        assert!(train_test_split(1, 0.2, None).is_err());
    }

    #[test]
    fn test_load_data_binarizes_related() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE DisasterResponse (
                id INTEGER, message TEXT, original TEXT, genre TEXT,
                related INTEGER, water INTEGER
             );
             INSERT INTO DisasterResponse VALUES
                (1, 'need water', NULL, 'direct', 2, 1),
                (2, 'all good', NULL, 'news', 0, 0);",
        )
        .unwrap();
        drop(conn);

        let data = load_data(&path, "DisasterResponse", SentinelPolicy::Positive).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.category_names, ["related", "water"]);
        assert_eq!(data.labels.row(0), [1, 1]);

        let data = load_data(&path, "DisasterResponse", SentinelPolicy::Negative).unwrap();
        assert_eq!(data.labels.row(0), [0, 1]);

        let (texts, labels) = data.subset(&[1]);
        assert_eq!(texts, ["all good"]);
        assert_eq!(labels.row(0), [0, 0]);
    }

    #[test]
    fn test_load_data_missing_file() {
        assert!(load_data("/no/such/file.db", "DisasterResponse", SentinelPolicy::default()).is_err());
    }
}
