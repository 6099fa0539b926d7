use thiserror::Error;

/// Errors that can occur during Triage core operations.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The SQLite store could not be opened or queried.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A model artifact could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A regex pattern failed to compile.
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// The message table does not have the expected column layout.
    #[error("invalid table schema: {0}")]
    InvalidSchema(String),

    /// A category cell holds a value outside the allowed set.
    #[error("invalid label {value} in column {column:?} (message id {id})")]
    InvalidLabel {
        /// Category column name.
        column: String,
        /// Row id of the offending message.
        id: i64,
        /// The stored value.
        value: i64,
    },

    /// The dataset (or a split of it) holds no messages.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Two inputs that must line up row-for-row or column-for-column do not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Actual size.
        actual: usize,
    },

    /// `predict` or `transform` was called before `fit`.
    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    /// The artifact was written by an incompatible revision.
    #[error("incompatible model artifact: found {found}, expected {expected}")]
    IncompatibleArtifact {
        /// Schema/version tag found in the file.
        found: String,
        /// Schema/version tag this build understands.
        expected: String,
    },

    /// The model's categories differ from the dataset's category columns.
    #[error("category mismatch between model and dataset: {0}")]
    CategoryMismatch(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool for the grid search could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for Triage operations.
pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = TriageError::EmptyDataset;
        assert_eq!(err.to_string(), "dataset is empty");

        let err = TriageError::InvalidLabel {
            column: "food".into(),
            id: 7,
            value: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("food"));
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));

        let err = TriageError::DimensionMismatch {
            expected: 36,
            actual: 35,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 36, got 35");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TriageError>();
    }
}
