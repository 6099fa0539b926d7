//! # Triage
//!
//! Classifies disaster-response messages into aid categories.
//!
//! - [`classifier`]: normalization, dataset loading, the TF-IDF + AdaBoost
//!   pipeline, grid search and model artifacts.
//! - [`trainer`]: the training and evaluation workflow behind `train`.
//! - [`server`]: the dashboard and classification web service.

pub use triage_core as classifier;
pub use triage_server as server;
pub use triage_trainer as trainer;

pub use triage_core::{
    ClassificationReport, Dataset, GridSearch, LabelMatrix, ModelArtifact, MultiLabelEstimator,
    Normalizer, Pipeline, Result, SearchConfig, TriageError, load_dataset,
};
