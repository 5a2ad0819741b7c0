use std::sync::Arc;

use serde::{Deserialize, Serialize};
use topicrec_core::{Error, Result, TermWeights, Variant, Vector};

use crate::lsa::LsaProjector;
use crate::nmf::NmfProjector;

/// A trained latent-space projection from term weights to K-dim vectors.
pub trait Projector: Send + Sync + std::fmt::Debug {
    /// The latent-space family this projector was trained as.
    fn variant(&self) -> Variant;

    /// Vocabulary size the projector was fitted on.
    fn input_dim(&self) -> usize;

    /// K, the latent dimensionality of every projected vector.
    fn output_dim(&self) -> usize;

    /// Project one term-weight vector. The output always has
    /// `output_dim()` components.
    fn project(&self, weights: &TermWeights) -> Result<Vector>;
}

/// Serialized projector of either family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProjectorArtifact {
    Lsa(LsaProjector),
    Nmf(NmfProjector),
}

impl ProjectorArtifact {
    pub fn variant(&self) -> Variant {
        match self {
            ProjectorArtifact::Lsa(_) => Variant::Lsa,
            ProjectorArtifact::Nmf(_) => Variant::Nmf,
        }
    }

    pub fn into_projector(self) -> Arc<dyn Projector> {
        match self {
            ProjectorArtifact::Lsa(p) => Arc::new(p),
            ProjectorArtifact::Nmf(p) => Arc::new(p),
        }
    }
}

impl From<LsaProjector> for ProjectorArtifact {
    fn from(p: LsaProjector) -> Self {
        ProjectorArtifact::Lsa(p)
    }
}

impl From<NmfProjector> for ProjectorArtifact {
    fn from(p: NmfProjector) -> Self {
        ProjectorArtifact::Nmf(p)
    }
}

/// Validate a row-major `n_components x n_features` component matrix.
pub(crate) fn check_components(
    n_components: usize,
    n_features: usize,
    components: &[f32],
) -> Result<()> {
    if n_components == 0 || n_features == 0 {
        return Err(Error::ArtifactLoad(format!(
            "projector shape {}x{} is empty",
            n_components, n_features
        )));
    }
    let expected = n_components.checked_mul(n_features).ok_or_else(|| {
        Error::ArtifactLoad("projector shape overflows".to_string())
    })?;
    if components.len() != expected {
        return Err(Error::ArtifactLoad(format!(
            "projector declares {}x{} components but stores {} values",
            n_components,
            n_features,
            components.len()
        )));
    }
    if components.iter().any(|c| !c.is_finite()) {
        return Err(Error::ArtifactLoad(
            "projector components contain non-finite values".to_string(),
        ));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_input(expected: usize, weights: &TermWeights) -> Result<()> {
    if weights.dim() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: weights.dim(),
        });
    }
    Ok(())
}
