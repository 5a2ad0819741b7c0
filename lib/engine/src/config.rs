use serde::{Deserialize, Serialize};
use topicrec_core::DEFAULT_PARALLEL_THRESHOLD;

/// Extra ranked entries added to the candidate pool before random sampling.
///
/// Randomized mode samples `top_n` results from the first
/// `top_n + DEFAULT_OVERSAMPLE_MARGIN` of the ranking, so repeated searches
/// surface different restaurants while staying near the top matches.
pub const DEFAULT_OVERSAMPLE_MARGIN: usize = 20;

/// Configuration for a recommender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub oversample_margin: usize,
    /// Partition size at which scoring runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            oversample_margin: DEFAULT_OVERSAMPLE_MARGIN,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
