//! Latent semantic analysis projection (truncated SVD).

use serde::{Deserialize, Serialize};
use topicrec_core::{Error, Result, TermWeights, Variant, Vector};

use crate::projector::{check_components, check_input, Projector};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsaParts {
    pub n_components: usize,
    pub n_features: usize,
    /// Row-major right singular vectors, `n_components x n_features`
    pub components: Vec<f32>,
}

/// Projects term weights onto the top singular directions: `z = x * C^T`.
/// Linear, so components can be negative and a zero input maps to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LsaParts", into = "LsaParts")]
pub struct LsaProjector {
    n_components: usize,
    n_features: usize,
    components: Vec<f32>,
}

impl LsaProjector {
    pub fn new(n_components: usize, n_features: usize, components: Vec<f32>) -> Result<Self> {
        check_components(n_components, n_features, &components)?;
        Ok(Self {
            n_components,
            n_features,
            components,
        })
    }

    /// Build from one `Vec` per component.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_features) {
            return Err(Error::ArtifactLoad("ragged LSA component rows".to_string()));
        }
        let n_components = rows.len();
        Self::new(n_components, n_features, rows.concat())
    }

    fn component(&self, k: usize) -> &[f32] {
        &self.components[k * self.n_features..(k + 1) * self.n_features]
    }
}

impl Projector for LsaProjector {
    fn variant(&self) -> Variant {
        Variant::Lsa
    }

    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn output_dim(&self) -> usize {
        self.n_components
    }

    fn project(&self, weights: &TermWeights) -> Result<Vector> {
        check_input(self.n_features, weights)?;
        if weights.is_zero() {
            return Ok(Vector::zeros(self.n_components));
        }
        let z = (0..self.n_components)
            .map(|k| weights.dot_dense(self.component(k)))
            .collect();
        Ok(Vector::new(z))
    }
}

impl TryFrom<LsaParts> for LsaProjector {
    type Error = Error;

    fn try_from(p: LsaParts) -> Result<Self> {
        Self::new(p.n_components, p.n_features, p.components)
    }
}

impl From<LsaProjector> for LsaParts {
    fn from(p: LsaProjector) -> Self {
        LsaParts {
            n_components: p.n_components,
            n_features: p.n_features,
            components: p.components,
        }
    }
}
