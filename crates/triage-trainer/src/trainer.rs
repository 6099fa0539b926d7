//! Load → split → search → evaluate → save.

use std::path::{Path, PathBuf};

use anyhow::Context;
use triage_core::{
    ClassificationReport, DEFAULT_TABLE, LabelMatrix, ModelArtifact, MultiLabelEstimator,
    Scoring, SearchConfig, SentinelPolicy, TfidfTransformer,
};

use crate::data::{load_data, train_test_split};
use crate::model::build_model;

/// Printed when the CLI does not get exactly two paths.
pub const USAGE: &str = "Please provide the filepath of the disaster messages database \
as the first argument and the filepath of the model file to save the model to as the \
second argument.\n\nExample: train data/DisasterResponse.db models/classifier.json";

/// Trainer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub table: String,
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    /// Shuffle seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    pub sentinel: SentinelPolicy,
    pub search: SearchConfig,
    /// TF-IDF settings for every pipeline the search fits.
    pub tfidf: TfidfTransformer,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            test_size: 0.2,
            seed: None,
            sentinel: SentinelPolicy::default(),
            search: SearchConfig::default(),
            tfidf: TfidfTransformer::default(),
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the held-out fraction, clamped into `[0.01, 0.99]`.
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        if test_size.is_finite() {
            self.test_size = test_size.clamp(0.01, 0.99);
        }
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sentinel(mut self, sentinel: SentinelPolicy) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Number of cross-validation folds, at least 2.
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.search.folds = folds.max(2);
        self
    }

    /// Search worker threads. `None` or `Some(0)` uses every core.
    pub fn with_jobs(mut self, n_jobs: Option<usize>) -> Self {
        self.search.n_jobs = n_jobs.filter(|&n| n > 0);
        self
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.search.scoring = scoring;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_tfidf(mut self, tfidf: TfidfTransformer) -> Self {
        self.tfidf = tfidf;
        self
    }
}

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: ClassificationReport,
}

pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on `database`, print the evaluation report and write the
    /// artifact to `model_path`.
    pub fn run<P, Q>(&self, database: P, model_path: Q) -> anyhow::Result<TrainingOutcome>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let database = database.as_ref();
        let model_path = model_path.as_ref();

        println!("Loading data...\n    DATABASE: {}", database.display());
        let data = load_data(database, &self.config.table, self.config.sentinel)?;
        let split = train_test_split(data.len(), self.config.test_size, self.config.seed)?;
        let (x_train, y_train) = data.subset(&split.train);
        let (x_test, y_test) = data.subset(&split.test);
        tracing::info!(
            train = x_train.len(),
            test = x_test.len(),
            categories = data.category_names.len(),
            "split dataset"
        );

        println!("Building model...");
        let mut model = build_model(&self.config.search, &self.config.tfidf)?;

        println!("Training model...");
        model.fit(&x_train, &y_train).context("grid search failed")?;
        if let (Some(params), Some(score)) = (model.best_params(), model.best_score()) {
            println!("    Best parameters: {params} (mean {} {score:.4})", model.config().scoring);
        }

        println!("Evaluating model...");
        let report = evaluate_model(&model, &x_test, &y_test, &data.category_names)?;

        println!("Saving model...\n    MODEL: {}", model_path.display());
        let artifact = ModelArtifact::from_search(model, data.category_names)?;
        save_model(&artifact, model_path)?;

        println!("Trained model saved!");
        Ok(TrainingOutcome { artifact, report })
    }
}

/// Predict `texts` and print the per-category report against `labels`.
pub fn evaluate_model<M: MultiLabelEstimator>(
    model: &M,
    texts: &[String],
    labels: &LabelMatrix,
    category_names: &[String],
) -> anyhow::Result<ClassificationReport> {
    let predicted = model.predict(texts).context("prediction on test set failed")?;
    let report = ClassificationReport::new(labels, &predicted, category_names)?;
    println!("{report}");
    Ok(report)
}

pub fn save_model<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    artifact
        .save(path)
        .with_context(|| format!("failed to write model to {}", path.display()))
}

/// The database and model paths, when exactly two were given.
pub fn parse_paths(paths: &[PathBuf]) -> Option<(&Path, &Path)> {
    match paths {
        [database, model] => Some((database.as_path(), model.as_path())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use triage_core::ParamGrid;

    fn write_fixture(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE DisasterResponse (
                id INTEGER, message TEXT, original TEXT, genre TEXT,
                related INTEGER, water INTEGER, food INTEGER
             );",
        )
        .unwrap();
        let mut stmt = conn
            .prepare("INSERT INTO DisasterResponse VALUES (?1, ?2, NULL, 'direct', 1, ?3, ?4)")
            .unwrap();
        for i in 0..30i64 {
            let (text, water, food) = match i % 3 {
                0 => (format!("we have no water {i}"), 1, 0),
                1 => (format!("we have no food {i}"), 0, 1),
                _ => (format!("we have no problems {i}"), 0, 0),
            };
            stmt.execute(rusqlite::params![i, text, water, food]).unwrap();
        }
    }

    fn small_config() -> TrainerConfig {
        let grid = ParamGrid {
            learning_rate: vec![0.5],
            n_estimators: vec![5, 10],
        };
        TrainerConfig::new()
            .with_seed(Some(3))
            .with_jobs(Some(2))
            .with_search(SearchConfig::new().with_grid(grid).with_jobs(Some(2)))
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("DisasterResponse.db");
        let model_path = dir.path().join("models").join("classifier.json");
        write_fixture(&db);

        let outcome = Trainer::new(small_config()).run(&db, &model_path).unwrap();
        assert!(model_path.exists());
        assert_eq!(outcome.artifact.category_names, ["related", "water", "food"]);
        assert_eq!(outcome.report.labels.len(), 3);

        let loaded = ModelArtifact::load(&model_path).unwrap();
        let labels = loaded.predict_one("water is needed").unwrap();
        let water = loaded.category_names.iter().position(|c| c == "water").unwrap();
        assert_eq!(labels[water], 1);
        assert!(loaded.search.is_some());
    }

    #[test]
    fn test_run_missing_database_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("classifier.json");
        let result = Trainer::new(small_config()).run(dir.path().join("missing.db"), &model_path);
        assert!(result.is_err());
        assert!(!model_path.exists());
    }

    #[test]
    fn test_parse_paths_needs_exactly_two() {
        assert!(parse_paths(&[]).is_none());
        assert!(parse_paths(&[PathBuf::from("a.db")]).is_none());
        assert!(parse_paths(&[PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]).is_none());

        let paths = [PathBuf::from("a.db"), PathBuf::from("m.json")];
        let (db, model) = parse_paths(&paths).unwrap();
        assert_eq!(db, Path::new("a.db"));
        assert_eq!(model, Path::new("m.json"));
    }

    #[test]
    fn test_config_clamps() {
        let config = TrainerConfig::new()
            .with_test_size(1.5)
            .with_folds(1)
            .with_jobs(Some(0));
        assert_eq!(config.test_size, 0.99);
        assert_eq!(config.search.folds, 2);
        assert_eq!(config.search.n_jobs, None);
    }
}
