//! Exhaustive hyperparameter search with k-fold cross-validation.
//!
//! Every `(candidate, fold)` pair is an independent fit, so the whole grid
//! is scored in parallel on a dedicated rayon pool. The candidate with the
//! highest mean fold score wins (earliest candidate on ties) and is refit
//! on the full training set.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};
use crate::estimator::MultiLabelEstimator;
use crate::metrics::Scoring;
use crate::model::adaboost::AdaBoostParams;
use crate::model::pipeline::Pipeline;

/// Values tried for each boosting hyperparameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub learning_rate: Vec<f64>,
    pub n_estimators: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            learning_rate: vec![0.5, 0.7],
            n_estimators: vec![20, 30, 50],
        }
    }
}

impl ParamGrid {
    /// Cartesian product, learning rate varying slowest.
    pub fn candidates(&self) -> Vec<AdaBoostParams> {
        self.learning_rate
            .iter()
            .flat_map(|&lr| {
                self.n_estimators
                    .iter()
                    .map(move |&n| AdaBoostParams::new(lr, n))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.learning_rate.len() * self.n_estimators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub grid: ParamGrid,
    /// Number of cross-validation folds.
    pub folds: usize,
    pub scoring: Scoring,
    /// Worker threads. `None` uses every core.
    pub n_jobs: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grid: ParamGrid::default(),
            folds: 3,
            scoring: Scoring::default(),
            n_jobs: None,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, grid: ParamGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_jobs(mut self, n_jobs: Option<usize>) -> Self {
        self.n_jobs = n_jobs;
        self
    }
}

/// Cross-validation outcome of one grid candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub params: AdaBoostParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
    /// 1 for the best mean score; tied candidates share a rank.
    pub rank: usize,
}

/// Contiguous, unshuffled k-fold split of `0..n` into `(train, test)` pairs.
///
/// The first `n % k` folds hold one extra sample.
pub fn kfold(n: usize, k: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
    if k < 2 || k > n {
        return Err(TriageError::InvalidConfig(format!(
            "cannot split {n} samples into {k} folds"
        )));
    }

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let size = n / k + usize::from(fold < n % k);
        let end = start + size;
        let test: Vec<usize> = (start..end).collect();
        let train: Vec<usize> = (0..start).chain(end..n).collect();
        folds.push((train, test));
        start = end;
    }
    Ok(folds)
}

fn select(texts: &[String], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| texts[i].clone()).collect()
}

/// Grid search over a [`Pipeline`]'s boosting parameters.
#[derive(Debug, Clone)]
pub struct GridSearch {
    base: Pipeline,
    config: SearchConfig,
    results: Vec<CandidateResult>,
    best_index: Option<usize>,
    best: Option<Pipeline>,
}

impl GridSearch {
    /// `base` supplies everything except the boosting parameters.
    pub fn new(base: Pipeline, config: SearchConfig) -> Self {
        Self {
            base,
            config,
            results: Vec::new(),
            best_index: None,
            best: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The unfitted pipeline every candidate is cloned from.
    pub fn base(&self) -> &Pipeline {
        &self.base
    }

    /// Per-candidate results in grid order, empty before `fit`.
    pub fn results(&self) -> &[CandidateResult] {
        &self.results
    }

    pub fn best_params(&self) -> Option<AdaBoostParams> {
        self.best_index.map(|i| self.results[i].params)
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best_index.map(|i| self.results[i].mean_score)
    }

    /// The winning pipeline refit on all training data.
    pub fn best_estimator(&self) -> Option<&Pipeline> {
        self.best.as_ref()
    }

    pub fn into_best_estimator(self) -> Option<Pipeline> {
        self.best
    }

    fn score_grid(
        &self,
        pool: &rayon::ThreadPool,
        candidates: &[AdaBoostParams],
        texts: &[String],
        labels: &LabelMatrix,
    ) -> Result<Vec<Vec<f64>>> {
        let folds = kfold(texts.len(), self.config.folds)?;
        let jobs: Vec<(usize, usize)> = (0..candidates.len())
            .flat_map(|c| (0..folds.len()).map(move |f| (c, f)))
            .collect();
        let total = jobs.len();

        tracing::info!(
            "Fitting {} folds for each of {} candidates, totalling {} fits",
            folds.len(),
            candidates.len(),
            total
        );

        let scored = pool.install(|| {
            jobs.par_iter()
                .map(|&(c, f)| {
                    let (train, test) = &folds[f];
                    let params = candidates[c];

                    let mut pipeline = self.base.with_params(params);
                    pipeline.fit(&select(texts, train), &labels.select_rows(train))?;
                    let predicted = pipeline.predict(&select(texts, test))?;
                    let score = self
                        .config
                        .scoring
                        .score(&labels.select_rows(test), &predicted)?;

                    tracing::info!(
                        "[CV {}/{}] END {}; score={:.3}",
                        f + 1,
                        folds.len(),
                        params,
                        score
                    );
                    Ok((c, f, score))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut scores = vec![vec![0.0; folds.len()]; candidates.len()];
        for (c, f, score) in scored {
            scores[c][f] = score;
        }
        Ok(scores)
    }
}

impl MultiLabelEstimator for GridSearch {
    fn fit(&mut self, texts: &[String], labels: &LabelMatrix) -> Result<()> {
        if texts.len() != labels.n_rows() {
            return Err(TriageError::DimensionMismatch {
                expected: texts.len(),
                actual: labels.n_rows(),
            });
        }
        let candidates = self.config.grid.candidates();
        if candidates.is_empty() {
            return Err(TriageError::InvalidConfig("parameter grid is empty".into()));
        }
        for params in &candidates {
            params.validate()?;
        }

        // Shared by the fold fits and the final refit.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.n_jobs.unwrap_or(0))
            .build()?;
        let scores = self.score_grid(&pool, &candidates, texts, labels)?;

        let mut results: Vec<CandidateResult> = candidates
            .iter()
            .zip(scores)
            .map(|(&params, fold_scores)| {
                let k = fold_scores.len() as f64;
                let mean = fold_scores.iter().sum::<f64>() / k;
                let var = fold_scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / k;
                CandidateResult {
                    params,
                    fold_scores,
                    mean_score: mean,
                    std_score: var.sqrt(),
                    rank: 0,
                }
            })
            .collect();

        let means: Vec<f64> = results.iter().map(|r| r.mean_score).collect();
        for result in &mut results {
            result.rank = 1 + means.iter().filter(|&&m| m > result.mean_score).count();
        }

        let mut best_index = 0;
        for (i, result) in results.iter().enumerate() {
            if result.mean_score > results[best_index].mean_score {
                best_index = i;
            }
        }

        let best_params = results[best_index].params;
        tracing::info!(
            best = %best_params,
            score = results[best_index].mean_score,
            "refitting best candidate on full training set"
        );

        let mut best = self.base.with_params(best_params);
        pool.install(|| best.fit(texts, labels))?;

        self.results = results;
        self.best_index = Some(best_index);
        self.best = Some(best);
        Ok(())
    }

    fn predict(&self, texts: &[String]) -> Result<LabelMatrix> {
        self.best
            .as_ref()
            .ok_or(TriageError::NotFitted("GridSearch"))?
            .predict(texts)
    }
}
