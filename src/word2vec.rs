//! Pretrained word vector lookups
//!
//! `KeyedVectors` holds a word2vec table fully in memory. `EmptyWord2Vec`
//! knows no words at all and lets the encoder run without loading the
//! multi gigabyte pretrained file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Error, Result};

/// Word to vector lookup consumed by the encoder.
pub trait WordVectors {
    /// Is the word present in the pretrained table
    fn contains(&self, word: &str) -> bool;
    /// Vector for the word, if known
    fn word_vec(&self, word: &str) -> Option<ArrayView1<'_, f32>>;
    /// Width of every vector
    fn vector_size(&self) -> usize;
    /// Number of words in the table
    fn len(&self) -> usize;

    /// True when the table holds no words
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stand in lookup that contains nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWord2Vec;

impl WordVectors for EmptyWord2Vec {
    fn contains(&self, _word: &str) -> bool {
        false
    }
    fn word_vec(&self, _word: &str) -> Option<ArrayView1<'_, f32>> {
        None
    }
    fn vector_size(&self) -> usize {
        0
    }
    fn len(&self) -> usize {
        0
    }
}

/// In memory word2vec table.
#[derive(Debug, Clone)]
pub struct KeyedVectors {
    index: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl KeyedVectors {
    /// Build a table from `(word, vector)` pairs. Every vector must be `dim` wide.
    ///
    /// Later duplicates of a word are ignored.
    pub fn from_pairs<I, S>(dim: usize, pairs: I) -> Result<KeyedVectors>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = TableBuilder::new(dim);
        for (entry, (word, vector)) in pairs.into_iter().enumerate() {
            table.push(entry, word.into(), vector)?;
        }
        table.finish()
    }

    /// Load a word2vec file in binary or text layout.
    ///
    /// `limit` caps how many vectors are read from the top of the file.
    pub fn load_word2vec_format(path: &Path, binary: bool, limit: Option<usize>) -> Result<KeyedVectors> {
        info!("loading word2vec vectors from {}", path.display());
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = BufReader::new(file);
        let kv = if binary {
            read_binary(&mut reader, limit).map_err(|e| attach_path(e, path))?
        } else {
            read_text(&mut reader, limit).map_err(|e| attach_path(e, path))?
        };
        info!("loaded {} vectors of size {}", kv.len(), kv.vector_size());
        Ok(kv)
    }

    /// Matrix of all vectors, one row per word in file order.
    pub fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }
}

impl WordVectors for KeyedVectors {
    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }
    fn word_vec(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.index.get(word).map(|row| self.vectors.index_axis(Axis(0), *row))
    }
    fn vector_size(&self) -> usize {
        self.vectors.ncols()
    }
    fn len(&self) -> usize {
        self.index.len()
    }
}

/// Where the encoder gets its pretrained vectors from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word2VecSource {
    /// A word2vec file on disk
    Pretrained {
        path: PathBuf,
        binary: bool,
        limit: Option<usize>,
    },
    /// No pretrained vectors; every word gets a random row
    Empty,
}

impl Word2VecSource {
    /// Load the lookup this source describes.
    pub fn load(&self) -> Result<Box<dyn WordVectors>> {
        match self {
            Word2VecSource::Pretrained { path, binary, limit } => {
                info!("Loading word2vec model (it may take a few minutes)...");
                let kv = KeyedVectors::load_word2vec_format(path, *binary, *limit)?;
                Ok(Box::new(kv))
            }
            Word2VecSource::Empty => {
                info!("using empty word2vec lookup");
                Ok(Box::new(EmptyWord2Vec))
            }
        }
    }
}

fn attach_path(err: Error, path: &Path) -> Error {
    match err {
        Error::Io { source, .. } => Error::io(path, source),
        other => other,
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(|e| Error::io("<header>", e))?;
    let mut parts = line.split_whitespace().map(|p| p.parse::<usize>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(count)), Some(Ok(dim)), None) => Ok((count, dim)),
        _ => Err(Error::format(0, format!("bad header {:?}", line.trim_end()))),
    }
}

/// Accumulates words and their values straight into one flat buffer.
struct TableBuilder {
    dim: usize,
    index: HashMap<String, usize>,
    flat: Vec<f32>,
}

impl TableBuilder {
    fn new(dim: usize) -> Self {
        TableBuilder { dim, index: HashMap::new(), flat: Vec::new() }
    }

    fn push<V: IntoIterator<Item = f32>>(&mut self, entry: usize, word: String, values: V) -> Result<()> {
        if self.index.contains_key(&word) {
            debug!("duplicate word {} at entry {}", word, entry);
            return Ok(());
        }
        let start = self.flat.len();
        self.flat.extend(values);
        let width = self.flat.len() - start;
        if width != self.dim {
            self.flat.truncate(start);
            return Err(Error::format(
                entry,
                format!("vector has {} values, header says {}", width, self.dim),
            ));
        }
        self.index.insert(word, self.index.len());
        Ok(())
    }

    fn finish(self) -> Result<KeyedVectors> {
        let rows = self.index.len();
        let vectors = Array2::from_shape_vec((rows, self.dim), self.flat)
            .map_err(|e| Error::format(rows, e.to_string()))?;
        Ok(KeyedVectors { index: self.index, vectors })
    }
}

fn read_binary<R: BufRead>(reader: &mut R, limit: Option<usize>) -> Result<KeyedVectors> {
    let (count, dim) = read_header(reader)?;
    let count = limit.map_or(count, |l| l.min(count));
    let record_len = dim
        .checked_mul(4)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| Error::format(0, format!("vector size {} is too large", dim)))?;
    let mut table = TableBuilder::new(dim);
    let mut word_buf: Vec<u8> = Vec::new();
    let mut vec_buf: Vec<u8> = Vec::new();
    for entry in 0..count {
        word_buf.clear();
        reader
            .read_until(b' ', &mut word_buf)
            .map_err(|e| Error::io("<word>", e))?;
        if word_buf.pop() != Some(b' ') {
            return Err(Error::format(entry, "unexpected end of file while reading word"));
        }
        // records may be separated by a newline
        let start = word_buf.iter().position(|b| *b != b'\n' && *b != b'\r').unwrap_or(word_buf.len());
        let word = String::from_utf8(word_buf[start..].to_vec())
            .map_err(|e| Error::format(entry, e.to_string()))?;
        // grows with the bytes actually present instead of trusting the header
        vec_buf.clear();
        let read = (&mut *reader)
            .take(record_len)
            .read_to_end(&mut vec_buf)
            .map_err(|e| Error::io("<vector>", e))?;
        if read as u64 != record_len {
            return Err(Error::format(entry, format!("truncated vector for {:?}", word)));
        }
        let values = vec_buf
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]));
        table.push(entry, word, values)?;
    }
    table.finish()
}

fn read_text<R: BufRead>(reader: &mut R, limit: Option<usize>) -> Result<KeyedVectors> {
    let (count, dim) = read_header(reader)?;
    let count = limit.map_or(count, |l| l.min(count));
    let mut table = TableBuilder::new(dim);
    let mut line = String::new();
    let mut values: Vec<f32> = Vec::new();
    for entry in 0..count {
        line.clear();
        let read = reader.read_line(&mut line).map_err(|e| Error::io("<line>", e))?;
        if read == 0 {
            return Err(Error::format(entry, "unexpected end of file"));
        }
        let mut parts = line.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| Error::format(entry, "empty line"))?
            .to_string();
        values.clear();
        for v in parts {
            values.push(v.parse::<f32>().map_err(|e| Error::format(entry, e.to_string()))?);
        }
        table.push(entry, word, values.iter().copied())?;
    }
    table.finish()
}
