use serde::{Deserialize, Serialize};
use crate::vector::Vector;

/// Identifier of one corpus row (a restaurant / business id).
///
/// Opaque: never ordered or compared other than for equality. Integer keys
/// are stored in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

impl From<u64> for DocumentId {
    fn from(i: u64) -> Self {
        DocumentId(i.to_string())
    }
}

/// One row of a corpus table: a document, its latent vector and its city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusRow {
    pub id: DocumentId,
    pub vector: Vector,
    pub city: String,
}

impl CorpusRow {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<DocumentId>, vector: Vector, city: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            city: city.into(),
        }
    }
}

/// A ranked hit: document id and its cosine similarity to the query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub score: f32,
}

impl ScoredDocument {
    #[inline]
    #[must_use]
    pub fn new(id: DocumentId, score: f32) -> Self {
        Self { id, score }
    }
}
