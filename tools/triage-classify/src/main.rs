use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use triage_core::ModelArtifact;

/// Classify messages read line by line from stdin, one JSON object per line.
#[derive(Parser)]
#[command(name = "triage-classify", version, about)]
struct Cli {
    /// Trained model artifact
    model: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyOutput {
    pub input: String,
    pub labels: BTreeMap<String, u8>,
    pub error: Option<String>,
}

fn classify_line(model: &ModelArtifact, line: &str) -> ClassifyOutput {
    match model.predict_one(line) {
        Ok(row) => ClassifyOutput {
            input: line.to_string(),
            labels: model.category_names.iter().cloned().zip(row).collect(),
            error: None,
        },
        Err(e) => ClassifyOutput {
            input: line.to_string(),
            labels: BTreeMap::new(),
            error: Some(e.to_string()),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let model = ModelArtifact::load(&cli.model)
        .with_context(|| format!("failed to load model from {}", cli.model.display()))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = classify_line(&model, line);
        writeln!(stdout, "{}", serde_json::to_string(&output)?)?;
    }

    Ok(())
}
