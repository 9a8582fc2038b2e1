//! # malstm
//!
//! Phrase pair preparation for Manhattan LSTM sentence similarity.
//!
//! Apache-2.0 License.
//!

pub mod config;
pub mod dataset;
/// Vocabulary and embedding matrix
///
pub mod embeddings;
mod error;
/// Similarity models
///
pub mod ml;
pub mod normalize;
pub mod padding;
pub mod prediction;
pub mod stopwords;
/// Pretrained word vectors
///
pub mod word2vec;

pub use error::{Error, Result};
