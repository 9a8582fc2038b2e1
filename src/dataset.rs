//! Phrase pair tables and their csv loaders

use std::path::Path;

use log::{error, info};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Which of the two phrase columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `phrase1`
    Left,
    /// `phrase2`
    Right,
}

impl Side {
    /// Both sides in encoding order
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// One row: two raw phrases and their id sequences.
///
/// `phrase1_n` and `phrase2_n` stay empty until the dataset is encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhrasePair {
    /// Raw left phrase
    pub phrase1: String,
    /// Raw right phrase
    pub phrase2: String,
    /// Ids of `phrase1`
    pub phrase1_n: Vec<usize>,
    /// Ids of `phrase2`
    pub phrase2_n: Vec<usize>,
}

impl PhrasePair {
    /// Unencoded pair
    pub fn new(phrase1: impl Into<String>, phrase2: impl Into<String>) -> Self {
        PhrasePair {
            phrase1: phrase1.into(),
            phrase2: phrase2.into(),
            ..Default::default()
        }
    }

    /// Raw text of one side
    pub fn phrase(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.phrase1,
            Side::Right => &self.phrase2,
        }
    }

    /// Id sequence of one side
    pub fn sequence(&self, side: Side) -> &[usize] {
        match side {
            Side::Left => &self.phrase1_n,
            Side::Right => &self.phrase2_n,
        }
    }

    /// Replace the id sequence of one side
    pub fn set_sequence(&mut self, side: Side, ids: Vec<usize>) {
        match side {
            Side::Left => self.phrase1_n = ids,
            Side::Right => self.phrase2_n = ids,
        }
    }
}

/// Table of phrase pairs, transformed in place by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<PhrasePair>,
}

impl Dataset {
    /// Wrap already built rows
    pub fn new(rows: Vec<PhrasePair>) -> Self {
        Dataset { rows }
    }

    /// Build from `(phrase1, phrase2)` tuples.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Dataset {
            rows: pairs.into_iter().map(|(a, b)| PhrasePair::new(a, b)).collect(),
        }
    }

    /// All rows in order
    pub fn rows(&self) -> &[PhrasePair] {
        &self.rows
    }

    /// Rows for in place encoding
    pub fn rows_mut(&mut self) -> &mut [PhrasePair] {
        &mut self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    #[serde(default)]
    question1: String,
    #[serde(default)]
    question2: String,
}

#[derive(Debug, Deserialize)]
struct PhraseRecord {
    #[serde(default)]
    phrase1: String,
    #[serde(default)]
    phrase2: String,
}

/// Open a csv and make sure every one of `columns` is in its header row.
fn csv_reader(path: &Path, columns: [&str; 2]) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers()?;
    for column in columns {
        if !headers.iter().any(|h| h == column) {
            error!("{} has no {} column", path.display(), column);
            return Err(Error::MissingColumn(String::from(column)));
        }
    }
    Ok(reader)
}

/// Load a prediction csv with `question1` and `question2` columns.
///
/// Other columns are ignored and empty cells read as empty phrases.
///
/// A file without both columns is an error.
pub fn load_predict_dataset(path: &Path) -> Result<Dataset> {
    info!("loading prediction set from {}", path.display());
    let mut reader = csv_reader(path, ["question1", "question2"])?;
    let mut rows: Vec<PhrasePair> = Vec::new();
    for record in reader.deserialize::<QuestionRecord>() {
        let record = record?;
        rows.push(PhrasePair::new(record.question1, record.question2));
    }
    info!("loaded {} phrase pairs", rows.len());
    Ok(Dataset::new(rows))
}

/// Load a csv that already uses `phrase1` and `phrase2` headers.
pub fn load_training_dataset(path: &Path) -> Result<Dataset> {
    info!("loading phrase set from {}", path.display());
    let mut reader = csv_reader(path, ["phrase1", "phrase2"])?;
    let mut rows: Vec<PhrasePair> = Vec::new();
    for record in reader.deserialize::<PhraseRecord>() {
        let record = record?;
        rows.push(PhrasePair::new(record.phrase1, record.phrase2));
    }
    info!("loaded {} phrase pairs", rows.len());
    Ok(Dataset::new(rows))
}
