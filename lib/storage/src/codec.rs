// Artifact payload encodings
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    #[default]
    Bincode,
    Json,
}

impl ArtifactFormat {
    /// `.json` files are JSON, everything else is bincode.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Bincode => "bin",
            ArtifactFormat::Json => "json",
        }
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            ArtifactFormat::Bincode => {
                bincode::serialize(value).map_err(|e| anyhow!("bincode encode: {}", e))
            }
            ArtifactFormat::Json => Ok(serde_json::to_vec(value)?),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            ArtifactFormat::Bincode => {
                bincode::deserialize(bytes).map_err(|e| anyhow!("bincode decode: {}", e))
            }
            ArtifactFormat::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }
}
