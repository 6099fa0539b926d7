//! Single-message classification.

use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Predicted value of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub category: String,
    pub value: u8,
}

/// A query and its labels, in dataset column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub query: String,
    pub labels: Vec<CategoryLabel>,
}

impl ClassificationResult {
    /// Value predicted for `category`.
    pub fn get(&self, category: &str) -> Option<u8> {
        self.labels
            .iter()
            .find(|l| l.category == category)
            .map(|l| l.value)
    }
}

/// Run the model on `query` and pair each prediction with its category.
pub fn classify(state: &AppState, query: &str) -> triage_core::Result<ClassificationResult> {
    let row = state.model.predict_one(query)?;
    let labels = state
        .dataset
        .category_names()
        .iter()
        .zip(row)
        .map(|(category, value)| CategoryLabel {
            category: category.clone(),
            value,
        })
        .collect();

    Ok(ClassificationResult {
        query: query.to_string(),
        labels,
    })
}
