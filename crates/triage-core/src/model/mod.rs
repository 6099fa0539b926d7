pub mod adaboost;
pub mod artifact;
pub mod multi_output;
pub mod pipeline;
pub mod search;
pub mod stump;

pub use adaboost::{AdaBoostClassifier, AdaBoostParams};
pub use artifact::{ARTIFACT_SCHEMA, ARTIFACT_VERSION, ModelArtifact, SearchSummary};
pub use multi_output::MultiOutputClassifier;
pub use pipeline::Pipeline;
pub use search::{CandidateResult, GridSearch, ParamGrid, SearchConfig, kfold};
pub use stump::{DecisionStump, Split};
