//! # Triage Trainer
//!
//! Builds the message classifier from a SQLite table: loads and splits the
//! data, grid-searches the boosting parameters, prints a per-category
//! evaluation report and saves the fitted pipeline as a JSON artifact.

pub mod data;
pub mod model;
pub mod trainer;

pub use data::{TrainTestSplit, TrainingData, load_data, train_test_split};
pub use model::build_model;
pub use trainer::{
    Trainer, TrainerConfig, TrainingOutcome, USAGE, evaluate_model, parse_paths, save_model,
};
