//! Zero padding of id sequences into fixed width matrices

use log::debug;
use ndarray::Array2;

use crate::dataset::{Dataset, Side};

/// Left and right padded id matrices, both `(rows, max_seq_length)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedPair {
    /// Padded `phrase1_n` ids
    pub left: Array2<usize>,
    /// Padded `phrase2_n` ids
    pub right: Array2<usize>,
}

impl PaddedPair {
    /// Matrix for one side
    pub fn get(&self, side: Side) -> &Array2<usize> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Pad one sequence with leading zeros to `max_len`.
///
/// Longer sequences keep their first `max_len` ids.
pub fn pad_sequence(ids: &[usize], max_len: usize) -> Vec<usize> {
    let kept = &ids[..ids.len().min(max_len)];
    let mut padded = vec![0usize; max_len - kept.len()];
    padded.extend_from_slice(kept);
    padded
}

fn pad_side(dataset: &Dataset, side: Side, max_seq_length: usize) -> Array2<usize> {
    let mut out = Array2::<usize>::zeros((dataset.len(), max_seq_length));
    for (mut dst, row) in out.rows_mut().into_iter().zip(dataset.rows()) {
        let ids = row.sequence(side);
        let kept = &ids[..ids.len().min(max_seq_length)];
        let offset = max_seq_length - kept.len();
        for (slot, id) in dst.iter_mut().skip(offset).zip(kept) {
            *slot = *id;
        }
    }
    out
}

/// Split an encoded dataset into left and right padded matrices.
pub fn split_and_zero_padding(dataset: &Dataset, max_seq_length: usize) -> PaddedPair {
    debug!("padding {} rows to length {}", dataset.len(), max_seq_length);
    PaddedPair {
        left: pad_side(dataset, Side::Left, max_seq_length),
        right: pad_side(dataset, Side::Right, max_seq_length),
    }
}

/// Longest id sequence over both columns, 0 for an empty dataset.
pub fn find_max_seq_length(dataset: &Dataset) -> usize {
    dataset
        .rows()
        .iter()
        .map(|r| r.phrase1_n.len().max(r.phrase2_n.len()))
        .max()
        .unwrap_or(0)
}
