//! Pipeline configuration
//!
//! Every field has a default, so an empty json object is a valid config.

use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Deserialize;

use crate::embeddings::{EncoderOptions, DEFAULT_EMBEDDING_DIM, DEFAULT_PROGRESS_EVERY};
use crate::error::{Error, Result};
use crate::stopwords::Stopwords;
use crate::word2vec::Word2VecSource;

/// Default location of the GoogleNews vectors, decompressed
pub const WORD2VEC_PATH: &str = "./data/GoogleNews-vectors-negative300.bin";
/// Overrides `word2vec_path` when set
pub const WORD2VEC_PATH_ENV: &str = "MALSTM_WORD2VEC_PATH";

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Word2vec file to load
    pub word2vec_path: PathBuf,
    /// Binary or text word2vec layout
    pub word2vec_binary: bool,
    /// Read at most this many vectors
    pub word2vec_limit: Option<usize>,
    /// Skip the pretrained vectors entirely
    pub empty_w2v: bool,
    /// Width of the embedding matrix rows
    pub embedding_dim: usize,
    /// Padding width, computed from the data when unset
    pub max_seq_length: Option<usize>,
    /// Rows between progress log lines
    pub progress_every: usize,
    /// Seed for the random embedding rows
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            word2vec_path: PathBuf::from(WORD2VEC_PATH),
            word2vec_binary: true,
            word2vec_limit: None,
            empty_w2v: false,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_length: None,
            progress_every: DEFAULT_PROGRESS_EVERY,
            seed: None,
        }
    }
}

impl Config {
    /// Read a json config file, apply the environment override and validate.
    pub fn from_file(path: &Path) -> Result<Config> {
        info!("reading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_str(&raw)?;
        config.with_env().validated()
    }

    /// Defaults plus the environment override.
    pub fn from_env() -> Result<Config> {
        Config::default().with_env().validated()
    }

    fn with_env(self) -> Config {
        match std::env::var(WORD2VEC_PATH_ENV) {
            Ok(path) if !path.is_empty() => self.with_word2vec_path(path),
            _ => self,
        }
    }

    fn with_word2vec_path(mut self, path: impl Into<PathBuf>) -> Config {
        self.word2vec_path = path.into();
        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validated(self) -> Result<Config> {
        if self.embedding_dim == 0 {
            error!("embedding_dim must be positive");
            return Err(Error::InvalidConfig(String::from("embedding_dim must be positive")));
        }
        if self.progress_every == 0 {
            error!("progress_every must be positive");
            return Err(Error::InvalidConfig(String::from("progress_every must be positive")));
        }
        Ok(self)
    }

    /// Which word vectors the encoder should load
    pub fn word2vec_source(&self) -> Word2VecSource {
        if self.empty_w2v {
            return Word2VecSource::Empty;
        }
        Word2VecSource::Pretrained {
            path: self.word2vec_path.clone(),
            binary: self.word2vec_binary,
            limit: self.word2vec_limit,
        }
    }

    /// Encoder settings derived from this config
    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            stopwords: Stopwords::english(),
            progress_every: self.progress_every,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn temp_json(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("malstm-cfg-{}-{}.json", std::process::id(), name));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.embedding_dim, 300);
        assert_eq!(config.progress_every, 1000);
    }

    #[test]
    fn reads_file() {
        let path = temp_json("ok", r#"{"empty_w2v": true, "embedding_dim": 50, "seed": 3, "max_seq_length": 10}"#);
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.embedding_dim, 50);
        assert_eq!(config.max_seq_length, Some(10));
        assert_eq!(config.word2vec_source(), Word2VecSource::Empty);
        assert_eq!(config.encoder_options().seed, Some(3));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_zero_dim() {
        let path = temp_json("zero", r#"{"embedding_dim": 0}"#);
        assert!(matches!(Config::from_file(&path), Err(Error::InvalidConfig(_))));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_unknown_fields() {
        let path = temp_json("unknown", r#"{"embedding_size": 10}"#);
        assert!(matches!(Config::from_file(&path), Err(Error::Json(_))));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn pretrained_source() {
        let config = Config::default().with_word2vec_path("/tmp/vectors.txt");
        let config = Config { word2vec_binary: false, word2vec_limit: Some(5), ..config };
        assert_eq!(
            config.word2vec_source(),
            Word2VecSource::Pretrained { path: PathBuf::from("/tmp/vectors.txt"), binary: false, limit: Some(5) }
        );
    }
}
