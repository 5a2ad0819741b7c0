//! Non-negative matrix factorization projection.
//!
//! With the trained components `H` (K x V, all >= 0) held fixed, a query
//! `x` is encoded as `argmin_{w >= 0} |x - w H|^2`, solved by cyclic
//! coordinate descent on the K x K Gram matrix `H H^T`.

use serde::{Deserialize, Serialize};
use topicrec_core::{Error, Result, TermWeights, Variant, Vector};

use crate::projector::{check_components, check_input, Projector};

/// Solver settings for encoding a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NmfOptions {
    /// Maximum coordinate-descent sweeps
    pub max_iter: usize,
    /// Stop once the projected-gradient violation drops to `tol` times
    /// the first sweep's
    pub tol: f64,
}

impl Default for NmfOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NmfParts {
    pub n_components: usize,
    pub n_features: usize,
    /// Row-major non-negative components, `n_components x n_features`
    pub components: Vec<f32>,
    #[serde(default)]
    pub options: NmfOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NmfParts", into = "NmfParts")]
pub struct NmfProjector {
    n_components: usize,
    n_features: usize,
    components: Vec<f32>,
    options: NmfOptions,
    // H H^T, row-major K x K
    gram: Vec<f64>,
}

impl NmfProjector {
    pub fn new(
        n_components: usize,
        n_features: usize,
        components: Vec<f32>,
        options: NmfOptions,
    ) -> Result<Self> {
        check_components(n_components, n_features, &components)?;
        if components.iter().any(|c| *c < 0.0) {
            return Err(Error::ArtifactLoad(
                "NMF components must be non-negative".to_string(),
            ));
        }
        if options.max_iter == 0 || !(options.tol >= 0.0) {
            return Err(Error::ArtifactLoad(format!(
                "invalid NMF solver options {:?}",
                options
            )));
        }

        let mut gram = vec![0.0f64; n_components * n_components];
        for a in 0..n_components {
            let row_a = &components[a * n_features..(a + 1) * n_features];
            for b in a..n_components {
                let row_b = &components[b * n_features..(b + 1) * n_features];
                let g: f64 = row_a
                    .iter()
                    .zip(row_b)
                    .map(|(x, y)| f64::from(*x) * f64::from(*y))
                    .sum();
                gram[a * n_components + b] = g;
                gram[b * n_components + a] = g;
            }
        }

        Ok(Self {
            n_components,
            n_features,
            components,
            options,
            gram,
        })
    }

    pub fn from_rows(rows: Vec<Vec<f32>>, options: NmfOptions) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_features) {
            return Err(Error::ArtifactLoad("ragged NMF component rows".to_string()));
        }
        let n_components = rows.len();
        Self::new(n_components, n_features, rows.concat(), options)
    }

    pub fn options(&self) -> NmfOptions {
        self.options
    }

    fn component(&self, k: usize) -> &[f32] {
        &self.components[k * self.n_features..(k + 1) * self.n_features]
    }

    fn solve(&self, weights: &TermWeights) -> Vec<f64> {
        let k = self.n_components;
        let xht: Vec<f64> = (0..k)
            .map(|c| f64::from(weights.dot_dense(self.component(c))))
            .collect();

        let mean = f64::from(weights.sum()) / self.n_features as f64;
        let init = (mean.max(0.0) / k as f64).sqrt();
        let mut w = vec![init; k];

        let mut violation_init = 0.0f64;
        for iter in 0..self.options.max_iter {
            let mut violation = 0.0f64;
            for t in 0..k {
                let gram_row = &self.gram[t * k..(t + 1) * k];
                let grad = gram_row.iter().zip(&w).map(|(g, wr)| g * wr).sum::<f64>() - xht[t];
                let projected = if w[t] == 0.0 { grad.min(0.0) } else { grad };
                violation += projected.abs();

                let hess = gram_row[t];
                if hess != 0.0 {
                    w[t] = (w[t] - grad / hess).max(0.0);
                }
            }

            if iter == 0 {
                violation_init = violation;
            }
            if violation_init == 0.0 || violation / violation_init <= self.options.tol {
                tracing::trace!(sweeps = iter + 1, "nmf encode converged");
                break;
            }
        }
        w
    }
}

impl Projector for NmfProjector {
    fn variant(&self) -> Variant {
        Variant::Nmf
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
        let w = self.solve(weights);
        Ok(Vector::new(w.into_iter().map(|x| x as f32).collect()))
    }
}

impl TryFrom<NmfParts> for NmfProjector {
    type Error = Error;

    fn try_from(p: NmfParts) -> Result<Self> {
        Self::new(p.n_components, p.n_features, p.components, p.options)
    }
}

impl From<NmfProjector> for NmfParts {
    fn from(p: NmfProjector) -> Self {
        NmfParts {
            n_components: p.n_components,
            n_features: p.n_features,
            components: p.components,
            options: p.options,
        }
    }
}
