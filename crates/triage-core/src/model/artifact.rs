//! Persisted model: the fitted pipeline plus what it was trained on.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};
use crate::estimator::MultiLabelEstimator;
use crate::metrics::Scoring;
use crate::model::adaboost::AdaBoostParams;
use crate::model::pipeline::Pipeline;
use crate::model::search::{CandidateResult, GridSearch};

/// Schema tag written into every artifact.
pub const ARTIFACT_SCHEMA: &str = "triage.pipeline";
/// Bumped whenever the serialized pipeline layout changes.
pub const ARTIFACT_VERSION: u32 = 1;

/// How the stored pipeline's parameters were chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub best_params: AdaBoostParams,
    pub best_score: f64,
    pub scoring: Scoring,
    pub folds: usize,
    pub candidates: Vec<CandidateResult>,
}

#[derive(Deserialize)]
struct Header {
    schema: String,
    version: u32,
}

/// A fitted pipeline with its category names and provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: String,
    pub version: u32,
    pub trained_at: DateTime<Utc>,
    /// Category names in prediction-column order.
    pub category_names: Vec<String>,
    pub search: Option<SearchSummary>,
    pub pipeline: Pipeline,
}

impl ModelArtifact {
    /// Wrap a fitted pipeline.
    pub fn new(pipeline: Pipeline, category_names: Vec<String>) -> Result<Self> {
        if pipeline.n_outputs() == 0 {
            return Err(TriageError::NotFitted("Pipeline"));
        }
        if pipeline.n_outputs() != category_names.len() {
            return Err(TriageError::DimensionMismatch {
                expected: pipeline.n_outputs(),
                actual: category_names.len(),
            });
        }
        Ok(Self {
            schema: ARTIFACT_SCHEMA.to_string(),
            version: ARTIFACT_VERSION,
            trained_at: Utc::now(),
            category_names,
            search: None,
            pipeline,
        })
    }

    /// Take the refit winner of a finished search, keeping its score table.
    pub fn from_search(search: GridSearch, category_names: Vec<String>) -> Result<Self> {
        let (Some(best_params), Some(best_score)) = (search.best_params(), search.best_score())
        else {
            return Err(TriageError::NotFitted("GridSearch"));
        };
        let summary = SearchSummary {
            best_params,
            best_score,
            scoring: search.config().scoring,
            folds: search.config().folds,
            candidates: search.results().to_vec(),
        };
        let pipeline = search
            .into_best_estimator()
            .ok_or(TriageError::NotFitted("GridSearch"))?;

        let mut artifact = Self::new(pipeline, category_names)?;
        artifact.search = Some(summary);
        Ok(artifact)
    }

    /// Write the artifact as JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read an artifact written by [`save`](Self::save).
    ///
    /// The schema tag and version are checked before the pipeline is decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;

        let header: Header = serde_json::from_slice(&bytes)?;
        if header.schema != ARTIFACT_SCHEMA || header.version != ARTIFACT_VERSION {
            return Err(TriageError::IncompatibleArtifact {
                found: format!("{} v{}", header.schema, header.version),
                expected: format!("{ARTIFACT_SCHEMA} v{ARTIFACT_VERSION}"),
            });
        }

        let artifact: Self = serde_json::from_slice(&bytes)?;
        if artifact.pipeline.n_outputs() != artifact.category_names.len() {
            return Err(TriageError::DimensionMismatch {
                expected: artifact.pipeline.n_outputs(),
                actual: artifact.category_names.len(),
            });
        }
        Ok(artifact)
    }

    pub fn predict(&self, texts: &[String]) -> Result<LabelMatrix> {
        self.pipeline.predict(texts)
    }

    /// Labels for a single message, in category order.
    pub fn predict_one(&self, text: &str) -> Result<Vec<u8>> {
        let matrix = self.predict(&[text.to_string()])?;
        Ok(matrix.row(0).to_vec())
    }

    /// Fail unless the artifact predicts exactly `names`, in order.
    pub fn check_categories(&self, names: &[String]) -> Result<()> {
        if self.category_names != names {
            return Err(TriageError::CategoryMismatch(format!(
                "model has {} categories, dataset has {}",
                self.category_names.len(),
                names.len()
            )));
        }
        Ok(())
    }
}
