use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_core::{Scoring, SentinelPolicy, TfidfTransformer};
use triage_trainer::{Trainer, TrainerConfig, USAGE, parse_paths};

/// Train the disaster-response message classifier.
#[derive(Parser)]
#[command(name = "train", version, about)]
struct Cli {
    /// DATABASE and MODEL paths
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Table holding the labeled messages
    #[arg(long, env = "TRIAGE_TABLE", default_value = triage_core::DEFAULT_TABLE)]
    table: String,

    /// Seed for the train/test shuffle
    #[arg(long, env = "TRIAGE_SEED")]
    seed: Option<u64>,

    /// Cross-validation folds
    #[arg(long, env = "TRIAGE_FOLDS", default_value_t = 3)]
    folds: usize,

    /// Grid-search worker threads (default: all cores)
    #[arg(long, env = "TRIAGE_JOBS")]
    jobs: Option<usize>,

    /// Fraction of rows held out for evaluation
    #[arg(long, env = "TRIAGE_TEST_SIZE", default_value_t = 0.2)]
    test_size: f64,

    /// How `related = 2` is labeled: positive or negative
    #[arg(long, env = "TRIAGE_RELATED_SENTINEL", default_value = "positive")]
    related_sentinel: SentinelPolicy,

    /// Cross-validation score: subset_accuracy or hamming_accuracy
    #[arg(long, env = "TRIAGE_SCORING", default_value = "subset_accuracy")]
    scoring: Scoring,

    /// Use `1 + ln(tf)` instead of raw term counts
    #[arg(long, env = "TRIAGE_SUBLINEAR_TF")]
    sublinear_tf: bool,

    /// Disable IDF smoothing
    #[arg(long, env = "TRIAGE_NO_SMOOTH_IDF")]
    no_smooth_idf: bool,
}

impl Cli {
    fn trainer_config(&self) -> TrainerConfig {
        let tfidf = TfidfTransformer::new()
            .with_smooth_idf(!self.no_smooth_idf)
            .with_sublinear_tf(self.sublinear_tf);

        TrainerConfig::new()
            .with_table(self.table.clone())
            .with_seed(self.seed)
            .with_folds(self.folds)
            .with_jobs(self.jobs)
            .with_test_size(self.test_size)
            .with_sentinel(self.related_sentinel)
            .with_scoring(self.scoring)
            .with_tfidf(tfidf)
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some((database, model)) = parse_paths(&cli.paths) else {
        println!("{USAGE}");
        return Ok(());
    };

    Trainer::new(cli.trainer_config()).run(database, model)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Training failed: {e:#}");
        std::process::exit(1);
    }
}
