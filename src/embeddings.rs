//! Vocabulary building and the embedding matrix
//!
//! Walks every row of a [`Dataset`], gives each first seen non stopword an
//! ascending id starting at 1 and writes the id sequences back into the rows.
//! The embedding matrix has one row per id plus the zero padding row 0.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::dataset::{Dataset, Side};
use crate::error::{Error, Result};
use crate::normalize::text_to_word_list;
use crate::stopwords::Stopwords;
use crate::word2vec::{Word2VecSource, WordVectors};

/// Embedding width of the GoogleNews vectors
pub const DEFAULT_EMBEDDING_DIM: usize = 300;
/// Rows between progress log lines
pub const DEFAULT_PROGRESS_EVERY: usize = 1000;

/// Word to id mapping. Id 0 is the padding id and is never handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    ids: HashMap<String, usize>,
    words: Vec<String>,
}

impl Vocabulary {
    /// Empty vocabulary
    pub fn new() -> Self {
        Default::default()
    }

    /// Id of a known word
    pub fn id(&self, word: &str) -> Option<usize> {
        self.ids.get(word).copied()
    }

    /// Word behind an id
    pub fn word(&self, id: usize) -> Option<&str> {
        id.checked_sub(1).and_then(|i| self.words.get(i)).map(String::as_str)
    }

    /// Existing id of `word`, or the next free one.
    pub fn get_or_insert(&mut self, word: &str) -> usize {
        if let Some(id) = self.ids.get(word) {
            return *id;
        }
        self.words.push(String::from(word));
        let id = self.words.len();
        self.ids.insert(String::from(word), id);
        id
    }

    /// `(word, id)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.words.iter().enumerate().map(|(i, w)| (w.as_str(), i + 1))
    }

    /// Number of words, not counting the padding id
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True before any word was added
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Knobs for the encoder that are not part of the data itself.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Words that never get an id
    pub stopwords: Stopwords,
    /// Log a progress line every this many rows
    pub progress_every: usize,
    /// Seed for the random rows, `None` draws from the os
    pub seed: Option<u64>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            stopwords: Stopwords::english(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            seed: None,
        }
    }
}

/// Result of encoding a dataset.
#[derive(Debug, Clone)]
pub struct W2vEmbeddings {
    /// Ids handed out while encoding
    pub vocabulary: Vocabulary,
    /// Words missing from the pretrained table, first seen order
    pub not_in_w2v: Vec<String>,
    /// `(vocabulary.len() + 1, embedding_dim)`, row 0 is zero
    pub embeddings: Array2<f32>,
}

/// Load the pretrained vectors named by `source`, encode `dataset` in place
///
/// and build the embedding matrix. The pretrained table is released before
///
/// returning.
pub fn make_w2v_embeddings(
    dataset: &mut Dataset,
    embedding_dim: usize,
    source: &Word2VecSource,
    options: &EncoderOptions,
) -> Result<W2vEmbeddings> {
    let word2vec = source.load()?;
    info!("word2vec loaded");
    let result = encode_dataset(dataset, embedding_dim, word2vec.as_ref(), options);
    drop(word2vec);
    debug!("word2vec released");
    result
}

/// Encode `dataset` in place against an already loaded lookup.
pub fn encode_dataset(
    dataset: &mut Dataset,
    embedding_dim: usize,
    word2vec: &dyn WordVectors,
    options: &EncoderOptions,
) -> Result<W2vEmbeddings> {
    if !word2vec.is_empty() && word2vec.vector_size() != embedding_dim {
        return Err(Error::DimensionMismatch {
            expected: embedding_dim,
            actual: word2vec.vector_size(),
        });
    }
    let mut vocabulary = Vocabulary::new();
    let mut not_in_w2v: Vec<String> = Vec::new();
    let mut seen_missing: HashSet<String> = HashSet::new();
    for (index, row) in dataset.rows_mut().iter_mut().enumerate() {
        if should_report(index, options.progress_every) {
            info!("{} sentences embedded.", index);
        }
        for side in Side::BOTH {
            let mut q2n: Vec<usize> = Vec::new();
            for word in text_to_word_list(row.phrase(side)) {
                if options.stopwords.contains(&word) {
                    continue;
                }
                if !word2vec.contains(&word) && seen_missing.insert(word.clone()) {
                    not_in_w2v.push(word.clone());
                }
                q2n.push(vocabulary.get_or_insert(&word));
            }
            row.set_sequence(side, q2n);
        }
    }
    info!(
        "vocabulary has {} words, {} not in word2vec",
        vocabulary.len(),
        not_in_w2v.len()
    );

    let embeddings = build_embedding_matrix(&vocabulary, embedding_dim, word2vec, options.seed);
    Ok(W2vEmbeddings { vocabulary, not_in_w2v, embeddings })
}

/// Progress is logged on every `every`th row, never on the first one.
fn should_report(index: usize, every: usize) -> bool {
    index != 0 && index % every.max(1) == 0
}

/// Standard normal rows, zero row 0, pretrained rows where the word is known.
fn build_embedding_matrix(
    vocabulary: &Vocabulary,
    embedding_dim: usize,
    word2vec: &dyn WordVectors,
    seed: Option<u64>,
) -> Array2<f32> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let mut embeddings = Array2::from_shape_simple_fn((vocabulary.len() + 1, embedding_dim), || {
        rng.sample::<f32, _>(StandardNormal)
    });
    // the padding row is ignored by the model
    embeddings.row_mut(0).fill(0.0);
    for (word, id) in vocabulary.iter() {
        if let Some(vector) = word2vec.word_vec(word) {
            embeddings.row_mut(id).assign(&vector);
        }
    }
    embeddings
}
