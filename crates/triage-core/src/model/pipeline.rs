//! Text → counts → TF-IDF → per-category AdaBoost.

use serde::{Deserialize, Serialize};

use crate::data::LabelMatrix;
use crate::error::{Result, TriageError};
use crate::estimator::{MultiLabelEstimator, Transformer};
use crate::features::{CountVectorizer, SparseMatrix, TfidfTransformer};
use crate::model::adaboost::{AdaBoostClassifier, AdaBoostParams};
use crate::model::multi_output::MultiOutputClassifier;
use crate::text::Normalizer;

/// The full classification pipeline. Fitting runs every stage in order on
/// the same texts; prediction reuses the fitted state of each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    vectorizer: CountVectorizer,
    tfidf: TfidfTransformer,
    classifier: MultiOutputClassifier<AdaBoostClassifier>,
}

impl Pipeline {
    pub fn new(normalizer: Normalizer, params: AdaBoostParams) -> Self {
        Self {
            vectorizer: CountVectorizer::new(normalizer),
            tfidf: TfidfTransformer::new(),
            classifier: MultiOutputClassifier::new(AdaBoostClassifier::new(params)),
        }
    }

    /// Replace the TF-IDF stage. Only its settings are kept; weights are
    /// learned again on `fit`.
    pub fn with_tfidf(mut self, tfidf: TfidfTransformer) -> Self {
        self.tfidf = tfidf.unfitted();
        self
    }

    /// An unfitted copy of this pipeline's configuration with different
    /// boosting parameters.
    pub fn with_params(&self, params: AdaBoostParams) -> Self {
        Self::new(self.vectorizer.normalizer().clone(), params).with_tfidf(self.tfidf.unfitted())
    }

    pub fn params(&self) -> AdaBoostParams {
        self.classifier.template().params()
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn tfidf(&self) -> &TfidfTransformer {
        &self.tfidf
    }

    pub fn classifier(&self) -> &MultiOutputClassifier<AdaBoostClassifier> {
        &self.classifier
    }

    /// Number of categories the pipeline predicts, zero before `fit`.
    pub fn n_outputs(&self) -> usize {
        self.classifier.n_outputs()
    }

    /// TF-IDF features for `texts` using the fitted vocabulary.
    pub fn features(&self, texts: &[String]) -> Result<SparseMatrix> {
        let counts = self.vectorizer.transform(texts)?;
        self.tfidf.transform(&counts)
    }
}

impl MultiLabelEstimator for Pipeline {
    fn fit(&mut self, texts: &[String], labels: &LabelMatrix) -> Result<()> {
        if texts.len() != labels.n_rows() {
            return Err(TriageError::DimensionMismatch {
                expected: texts.len(),
                actual: labels.n_rows(),
            });
        }
        let counts = self.vectorizer.fit_transform(texts)?;
        let weighted = self.tfidf.fit_transform(&counts)?;
        self.classifier.fit(&weighted, labels)
    }

    fn predict(&self, texts: &[String]) -> Result<LabelMatrix> {
        let features = self.features(texts)?;
        self.classifier.predict(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn training() -> (Vec<String>, LabelMatrix) {
        let x = texts(&[
            "we need water",
            "please send water",
            "no food here",
            "hungry need food",
            "water and food",
            "weather is fine",
        ]);
        // columns: water, food
        let y = LabelMatrix::from_rows(
            vec![
                vec![1, 0],
                vec![1, 0],
                vec![0, 1],
                vec![0, 1],
                vec![1, 1],
                vec![0, 0],
            ],
            2,
        )
        .unwrap();
        (x, y)
    }

    #[test]
    fn test_fit_predict() {
        let (x, y) = training();
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::new(0.5, 20));
        pipeline.fit(&x, &y).unwrap();

        assert_eq!(pipeline.n_outputs(), 2);
        assert_eq!(pipeline.predict(&x).unwrap(), y);

        let unseen = pipeline.predict(&texts(&["send water now"])).unwrap();
        assert_eq!(unseen.row(0), [1, 0]);
    }

    #[test]
    fn test_empty_message_predicts_a_row() {
        let (x, y) = training();
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::default());
        pipeline.fit(&x, &y).unwrap();

        let out = pipeline.predict(&texts(&[""])).unwrap();
        assert_eq!(out.n_rows(), 1);
        assert_eq!(out.n_cols(), 2);
    }

    #[test]
    fn test_with_params_is_unfitted() {
        let (x, y) = training();
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::default());
        pipeline.fit(&x, &y).unwrap();

        let other = pipeline.with_params(AdaBoostParams::new(0.7, 30));
        assert_eq!(other.params(), AdaBoostParams::new(0.7, 30));
        assert!(matches!(other.predict(&x), Err(TriageError::NotFitted(_))));
    }

    #[test]
    fn test_tfidf_settings_carry_over() {
        let (x, y) = training();
        let tfidf = TfidfTransformer::new()
            .with_smooth_idf(false)
            .with_sublinear_tf(true);
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::default())
            .with_tfidf(tfidf.clone());
        pipeline.fit(&x, &y).unwrap();

        let other = pipeline.with_params(AdaBoostParams::new(0.7, 30));
        assert_eq!(other.tfidf(), &tfidf);
        assert!(other.tfidf().idf().is_none());
        assert!(!pipeline.tfidf().smooth_idf());
        assert!(pipeline.tfidf().sublinear_tf());
    }

    #[test]
    fn test_length_mismatch() {
        let (x, _) = training();
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::default());
        let y = LabelMatrix::zeros(2, 2);
        assert!(matches!(
            pipeline.fit(&x, &y),
            Err(TriageError::DimensionMismatch { .. })
        ));
    }
}
