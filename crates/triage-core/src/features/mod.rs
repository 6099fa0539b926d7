pub mod count;
pub mod sparse;
pub mod tfidf;

pub use count::{CountVectorizer, Vocabulary};
pub use sparse::{SparseMatrix, SparseRow};
pub use tfidf::TfidfTransformer;
