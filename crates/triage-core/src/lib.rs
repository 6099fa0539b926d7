//! # Triage Core
//!
//! Building blocks for classifying disaster-response messages into
//! categories: message normalization, the SQLite dataset loader, TF-IDF
//! features, boosted per-category classifiers, grid search and the
//! persisted model artifact.
//!
//! ## Quick Start
//!
//! ```rust
//! use triage_core::{AdaBoostParams, LabelMatrix, MultiLabelEstimator, Normalizer, Pipeline};
//!
//! let texts: Vec<String> = ["we need water", "send food", "water please", "food now"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let labels = LabelMatrix::from_rows(vec![vec![1, 0], vec![0, 1], vec![1, 0], vec![0, 1]], 2).unwrap();
//!
//! let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::new(0.5, 20));
//! pipeline.fit(&texts, &labels).unwrap();
//!
//! let predicted = pipeline.predict(&["water is running out".to_string()]).unwrap();
//! assert_eq!(predicted.row(0), [1, 0]);
//! ```
pub mod data;
pub mod error;
pub mod estimator;
pub mod features;
pub mod metrics;
pub mod model;
pub mod text;

// Re-export primary API
pub use data::{
    DEFAULT_TABLE, Dataset, LabelMatrix, MessageRecord, RELATED, SentinelPolicy, load_dataset,
};
pub use error::{Result, TriageError};
pub use estimator::{BinaryClassifier, MultiLabelEstimator, Transformer};
pub use features::{CountVectorizer, SparseMatrix, TfidfTransformer, Vocabulary};
pub use metrics::{ClassificationReport, LabelMetrics, Scoring};
pub use model::{
    AdaBoostClassifier, AdaBoostParams, GridSearch, ModelArtifact, MultiOutputClassifier,
    ParamGrid, Pipeline, SearchConfig,
};
pub use text::{Normalizer, NormalizerConfig};
