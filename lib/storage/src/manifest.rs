use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use topicrec_core::Variant;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const FORMAT_VERSION: u32 = 1;

/// One artifact file inside the store directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// File name relative to the store root
    pub file: String,
    pub size: u64,
    /// Lowercase hex SHA-256 of the file contents
    pub sha256: String,
}

impl ArtifactEntry {
    pub fn for_bytes(file: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file: file.into(),
            size: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        }
    }

    /// Size and checksum both match `bytes`.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.size == bytes.len() as u64 && self.sha256 == sha256_hex(bytes)
    }
}

/// Artifacts encoded through one latent-space variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    /// K, shared by the projector output and every corpus vector
    pub dim: usize,
    pub projector: ArtifactEntry,
    pub corpus: ArtifactEntry,
}

/// Index of a store directory, written last so a partial write is never
/// mistaken for a complete store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreManifest {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub weighter: ArtifactEntry,
    pub variants: BTreeMap<Variant, VariantEntry>,
}

impl StoreManifest {
    pub fn variant(&self, variant: Variant) -> Option<&VariantEntry> {
        self.variants.get(&variant)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
