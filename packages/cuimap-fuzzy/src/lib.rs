//! Character n-gram features, cosine similarity, and an inverted index for approximate
//! dictionary lookups.

pub mod index;
pub mod ngram;

pub use index::NgramIndex;
pub use ngram::{CharNgrams, Features, cosine};
