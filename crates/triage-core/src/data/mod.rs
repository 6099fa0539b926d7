pub mod dataset;
pub mod loader;

pub use dataset::{
    Dataset, LabelMatrix, MessageRecord, RELATED, RELATED_SENTINEL, SentinelPolicy,
};
pub use loader::{DEFAULT_TABLE, LEADING_COLUMNS, load_dataset};
