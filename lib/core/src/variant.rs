use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::Error;

/// Latent-space family a projector and its corpus vectors belong to.
///
/// Vectors from different variants live in unrelated spaces and are never
/// scored against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Truncated orthogonal factorization (latent semantic analysis)
    Lsa,
    /// Non-negative matrix factorization
    Nmf,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Lsa, Variant::Nmf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Lsa => "lsa",
            Variant::Nmf => "nmf",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lsa" => Ok(Variant::Lsa),
            "nmf" => Ok(Variant::Nmf),
            other => Err(Error::InvalidArgument(format!(
                "unknown latent-space variant '{}', expected 'lsa' or 'nmf'",
                other
            ))),
        }
    }
}
