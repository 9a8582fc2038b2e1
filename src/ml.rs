//! Similarity models over padded id matrices

use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Anything that scores left/right phrase pairs.
///
/// A trained MaLSTM lives behind this trait; the crate itself only ships
///
/// [`MeanEmbeddingManhattan`].
pub trait SimilarityModel {
    /// One score per row. `left` and `right` must share a shape.
    fn predict(&self, left: ArrayView2<'_, usize>, right: ArrayView2<'_, usize>) -> Result<Array1<f32>>;
}

/// MaLSTM similarity `exp(-|a - b|_1)`, in (0, 1].
pub fn manhattan_similarity(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let l1: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    (-l1).exp()
}

/// Parameter free baseline: averages the embedding rows of the non padding
///
/// ids on each side and compares the two means with [`manhattan_similarity`].
#[derive(Debug, Clone)]
pub struct MeanEmbeddingManhattan {
    embeddings: Array2<f32>,
}

impl MeanEmbeddingManhattan {
    /// Wrap an embedding matrix whose row 0 is padding
    pub fn new(embeddings: Array2<f32>) -> Self {
        MeanEmbeddingManhattan { embeddings }
    }

    /// Mean of the embedding rows for `ids`, zeros are skipped.
    ///
    /// Ids outside the matrix are treated as padding.
    fn encode(&self, ids: ArrayView1<'_, usize>) -> Array1<f32> {
        let mut sum = Array1::<f32>::zeros(self.embeddings.ncols());
        let mut count = 0usize;
        for id in ids.iter().copied().filter(|id| *id != 0 && *id < self.embeddings.nrows()) {
            sum += &self.embeddings.index_axis(Axis(0), id);
            count += 1;
        }
        if count > 0 {
            sum /= count as f32;
        }
        sum
    }
}

impl SimilarityModel for MeanEmbeddingManhattan {
    fn predict(&self, left: ArrayView2<'_, usize>, right: ArrayView2<'_, usize>) -> Result<Array1<f32>> {
        if left.dim() != right.dim() {
            return Err(Error::ShapeMismatch { left: left.dim(), right: right.dim() });
        }
        info!("calculating manhattan similarity for {} pairs", left.nrows());
        let scores: Vec<f32> = left
            .axis_iter(Axis(0))
            .zip(right.axis_iter(Axis(0)))
            .map(|(l, r)| manhattan_similarity(self.encode(l).view(), self.encode(r).view()))
            .collect();
        Ok(Array1::from_vec(scores))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use ndarray::array;

    fn model() -> MeanEmbeddingManhattan {
        MeanEmbeddingManhattan::new(array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])
    }

    #[test]
    fn identical_vectors_score_one() {
        let v = array![0.3f32, -1.2, 4.0];
        assert_eq!(manhattan_similarity(v.view(), v.view()), 1.0);
    }

    #[test]
    fn similarity_decays_with_distance() {
        let a = array![0.0f32, 0.0];
        let near = array![0.5f32, 0.0];
        let far = array![2.0f32, 1.0];
        let s_near = manhattan_similarity(a.view(), near.view());
        let s_far = manhattan_similarity(a.view(), far.view());
        assert!((s_near - (-0.5f32).exp()).abs() < 1e-6);
        assert!(s_far < s_near);
        assert!(s_far > 0.0);
    }

    #[test]
    fn padding_is_ignored() {
        let m = model();
        let left = array![[0usize, 0, 1], [0, 1, 2]];
        let right = array![[0usize, 1, 0], [0, 0, 3]];
        let scores = m.predict(left.view(), right.view()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], 1.0);
        // mean of rows 1 and 2 is (0.5, 0.5), row 3 is (1, 1)
        assert!((scores[1] - (-1.0f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn both_sides_empty_score_one() {
        let m = model();
        let empty = array![[0usize, 0]];
        let scores = m.predict(empty.view(), empty.view()).unwrap();
        assert_eq!(scores[0], 1.0);
    }

    #[test]
    fn shape_mismatch() {
        let m = model();
        let left = array![[1usize, 2]];
        let right = array![[1usize, 2, 3]];
        let r = m.predict(left.view(), right.view());
        assert!(matches!(r, Err(Error::ShapeMismatch { left: (1, 2), right: (1, 3) })));
    }
}
