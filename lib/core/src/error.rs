use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the recommender core can report.
///
/// Empty rankings (unknown city, empty partition, out-of-vocabulary query)
/// are not errors and never reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
