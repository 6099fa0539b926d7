//! Shared, read-only application state.

use std::path::Path;

use anyhow::Context;
use triage_core::{Dataset, ModelArtifact, load_dataset};

/// Dataset and model, loaded once at startup and shared by every handler.
#[derive(Debug)]
pub struct AppState {
    pub dataset: Dataset,
    pub model: ModelArtifact,
}

impl AppState {
    /// Pair a dataset with a model that predicts exactly its categories.
    pub fn new(dataset: Dataset, model: ModelArtifact) -> triage_core::Result<Self> {
        model.check_categories(dataset.category_names())?;
        Ok(Self { dataset, model })
    }

    pub fn load<P, Q>(database: P, table: &str, model_path: Q) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (database, model_path) = (database.as_ref(), model_path.as_ref());

        let dataset = load_dataset(database, table)
            .with_context(|| format!("failed to load table '{table}' from {}", database.display()))?;
        let model = ModelArtifact::load(model_path)
            .with_context(|| format!("failed to load model from {}", model_path.display()))?;
        tracing::info!(
            messages = dataset.len(),
            categories = dataset.category_names().len(),
            trained_at = %model.trained_at,
            "loaded dataset and model"
        );

        Ok(Self::new(dataset, model)?)
    }
}
