//! Construction of the unfitted search estimator.

use triage_core::{
    AdaBoostParams, GridSearch, Normalizer, Pipeline, SearchConfig, TfidfTransformer,
};

/// The normalize → count → TF-IDF → AdaBoost pipeline wrapped in a grid
/// search over `config`. Nothing is fitted here.
pub fn build_model(
    config: &SearchConfig,
    tfidf: &TfidfTransformer,
) -> triage_core::Result<GridSearch> {
    let pipeline = Pipeline::new(Normalizer::new()?, AdaBoostParams::default())
        .with_tfidf(tfidf.unfitted());
    Ok(GridSearch::new(pipeline, config.clone()))
}
