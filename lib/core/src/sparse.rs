use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Sparse term-weight vector over a fixed vocabulary.
///
/// `indices` are strictly increasing and each is below `dim`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermWeights {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl TermWeights {
    /// The all-zero vector (an entirely out-of-vocabulary document).
    #[inline]
    #[must_use]
    pub fn empty(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(term index, weight)` pairs in any order.
    /// Duplicate indices are summed, explicit zeros are dropped.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f32)>) -> Result<Self> {
        pairs.sort_by_key(|(idx, _)| *idx);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if idx as usize >= dim {
                return Err(Error::InvalidInput(format!(
                    "term index {} out of range for vocabulary of {}",
                    idx, dim
                )));
            }
            match indices.last() {
                Some(last) if *last == idx => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(idx);
                    values.push(value);
                }
            }
        }

        let mut weights = Self { dim, indices, values };
        weights.retain_nonzero();
        Ok(weights)
    }

    fn retain_nonzero(&mut self) {
        if self.values.iter().all(|v| *v != 0.0) {
            return;
        }
        let (indices, values): (Vec<u32>, Vec<f32>) = self
            .indices
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (*i, *v))
            .unzip();
        self.indices = indices;
        self.values = values;
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(i, v)| (*i as usize, *v))
    }

    pub fn sum(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Rewrite every stored weight as `f(term index, weight)`.
    pub fn map_values(&mut self, mut f: impl FnMut(usize, f32) -> f32) {
        for (idx, value) in self.indices.iter().zip(self.values.iter_mut()) {
            *value = f(*idx as usize, *value);
        }
        self.retain_nonzero();
    }

    /// Scale to unit L2 norm; the zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Dot product against one dense row of length `dim`.
    #[inline]
    pub fn dot_dense(&self, row: &[f32]) -> f32 {
        self.iter().map(|(i, v)| v * row[i]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_merges_and_drops_zeros() {
        let w = TermWeights::from_pairs(10, vec![(7, 1.0), (2, 0.5), (7, 2.0), (4, 0.0)]).unwrap();
        assert_eq!(w.indices(), &[2, 7]);
        assert_eq!(w.values(), &[0.5, 3.0]);
        assert_eq!(w.nnz(), 2);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let err = TermWeights::from_pairs(3, vec![(3, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_l2_normalize() {
        let mut w = TermWeights::from_pairs(5, vec![(0, 3.0), (4, 4.0)]).unwrap();
        w.l2_normalize();
        assert!((w.values()[0] - 0.6).abs() < 1e-6);
        assert!((w.values()[1] - 0.8).abs() < 1e-6);

        let mut zero = TermWeights::empty(5);
        zero.l2_normalize();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_dot_dense() {
        let w = TermWeights::from_pairs(4, vec![(1, 2.0), (3, 1.0)]).unwrap();
        assert_eq!(w.dot_dense(&[9.0, 0.5, 9.0, 0.25]), 1.25);
    }
}
