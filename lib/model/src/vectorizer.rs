use std::sync::Arc;

use topicrec_core::{Error, Result, Variant, Vector};

use crate::artifact::{ProjectorSource, WeighterSource};
use crate::projector::Projector;
use crate::weighter::TermWeighter;

/// Turns a normalized query into a latent vector of one variant's space.
///
/// Holds its weighter and projector behind `Arc`, loaded once; vectorizing
/// is read-only, so one instance serves concurrent callers.
#[derive(Debug, Clone)]
pub struct QueryVectorizer {
    weighter: Arc<dyn TermWeighter>,
    projector: Arc<dyn Projector>,
}

impl QueryVectorizer {
    /// Pair a weighter and projector for a corpus of `corpus_dim`-dimensional
    /// vectors.
    pub fn new(
        weighter: Arc<dyn TermWeighter>,
        projector: Arc<dyn Projector>,
        corpus_dim: usize,
    ) -> Result<Self> {
        if projector.output_dim() != corpus_dim {
            return Err(Error::DimensionMismatch {
                expected: corpus_dim,
                actual: projector.output_dim(),
            });
        }
        if projector.input_dim() != weighter.vocab_size() {
            return Err(Error::DimensionMismatch {
                expected: weighter.vocab_size(),
                actual: projector.input_dim(),
            });
        }
        Ok(Self { weighter, projector })
    }

    /// Load both artifacts through their sources, then validate as [`new`](Self::new).
    pub fn load(
        weighter: &dyn WeighterSource,
        projector: &dyn ProjectorSource,
        corpus_dim: usize,
    ) -> Result<Self> {
        let weighter = weighter.load()?;
        let projector = projector.load()?;
        tracing::info!(
            variant = %projector.variant(),
            vocab = weighter.vocab_size(),
            dim = projector.output_dim(),
            "query vectorizer loaded"
        );
        Self::new(weighter, projector, corpus_dim)
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.projector.variant()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.projector.output_dim()
    }

    pub fn weighter(&self) -> &Arc<dyn TermWeighter> {
        &self.weighter
    }

    /// Vectorize already-normalized text. Always returns `dim()` components;
    /// a fully out-of-vocabulary query gives the zero vector.
    pub fn vectorize(&self, normalized: &str) -> Result<Vector> {
        let weights = self.weighter.weigh(normalized);
        if weights.is_zero() {
            tracing::debug!(variant = %self.variant(), "query has no in-vocabulary terms");
        }
        let vector = self.projector.project(&weights)?;
        debug_assert_eq!(vector.dim(), self.dim());
        Ok(vector)
    }
}
