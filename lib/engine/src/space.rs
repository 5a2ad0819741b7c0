use std::sync::Arc;

use topicrec_core::{CorpusTable, Error, Result, Variant};
use topicrec_model::QueryVectorizer;

/// One latent space: the vectorizer that encodes queries into it and the
/// corpus table encoded through the same projector.
#[derive(Debug, Clone)]
pub struct VariantSpace {
    vectorizer: QueryVectorizer,
    corpus: Arc<CorpusTable>,
}

impl VariantSpace {
    pub fn new(vectorizer: QueryVectorizer, corpus: impl Into<Arc<CorpusTable>>) -> Result<Self> {
        let corpus = corpus.into();
        if vectorizer.dim() != corpus.dim() {
            return Err(Error::DimensionMismatch {
                expected: corpus.dim(),
                actual: vectorizer.dim(),
            });
        }
        Ok(Self { vectorizer, corpus })
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.vectorizer.variant()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.corpus.dim()
    }

    pub fn vectorizer(&self) -> &QueryVectorizer {
        &self.vectorizer
    }

    pub fn corpus(&self) -> &CorpusTable {
        &self.corpus
    }
}
