//! Prediction driver
//!
//! Csv in, one similarity score per phrase pair out.

use std::path::Path;

use log::info;
use ndarray::Array1;

use crate::config::Config;
use crate::dataset::{load_predict_dataset, Dataset};
use crate::embeddings::{make_w2v_embeddings, EncoderOptions, W2vEmbeddings};
use crate::error::{Error, Result};
use crate::ml::SimilarityModel;
use crate::padding::{find_max_seq_length, split_and_zero_padding, PaddedPair};
use crate::word2vec::Word2VecSource;

/// Encode the prediction rows in place.
pub fn make_word2vec_embeddings(
    dataset: &mut Dataset,
    embedding_dim: usize,
    source: &Word2VecSource,
    options: &EncoderOptions,
) -> Result<W2vEmbeddings> {
    make_w2v_embeddings(dataset, embedding_dim, source, options)
}

/// Split to left/right and zero pad.
pub fn define_prediction_dataset(dataset: &Dataset, max_seq_length: usize) -> PaddedPair {
    split_and_zero_padding(dataset, max_seq_length)
}

/// Both sides must have the same shape before they reach a model.
pub fn check_prediction_dataset(padded: &PaddedPair) -> Result<()> {
    if padded.left.dim() != padded.right.dim() {
        return Err(Error::ShapeMismatch {
            left: padded.left.dim(),
            right: padded.right.dim(),
        });
    }
    Ok(())
}

/// Run the model and log the raw scores.
pub fn show_prediction_model(model: &dyn SimilarityModel, padded: &PaddedPair) -> Result<Array1<f32>> {
    let prediction = model.predict(padded.left.view(), padded.right.view())?;
    info!("prediction: {:?}", prediction);
    Ok(prediction)
}

/// Everything a caller needs after preparing a prediction set.
#[derive(Debug, Clone)]
pub struct PreparedPrediction {
    /// Encoded rows
    pub dataset: Dataset,
    /// Vocabulary and embedding matrix
    pub encoded: W2vEmbeddings,
    /// Model input
    pub padded: PaddedPair,
    /// Padding width used for `padded`
    pub max_seq_length: usize,
}

/// Load, encode, pad and check a prediction csv.
pub fn prepare_prediction(path: &Path, config: &Config) -> Result<PreparedPrediction> {
    let mut dataset = load_predict_dataset(path)?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let encoded = make_word2vec_embeddings(
        &mut dataset,
        config.embedding_dim,
        &config.word2vec_source(),
        &config.encoder_options(),
    )?;
    let max_seq_length = config
        .max_seq_length
        .unwrap_or_else(|| find_max_seq_length(&dataset));
    info!("max sequence length {}", max_seq_length);
    let padded = define_prediction_dataset(&dataset, max_seq_length);
    check_prediction_dataset(&padded)?;
    Ok(PreparedPrediction { dataset, encoded, padded, max_seq_length })
}
