//! # topicrec
//!
//! A restaurant recommender over topic-compressed review text.
//!
//! Reviews are reduced offline to a small latent space (LSA or NMF) and
//! stored per restaurant with its city. At query time a free-text search is
//! normalized, projected into the same space, and every restaurant of the
//! requested city is ranked by cosine similarity.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! topicrec --data-dir ./artifacts recommend --city "Las Vegas" --top 5 spicy ramen
//! topicrec --data-dir ./artifacts recommend --city Toronto --top 5 --variant nmf --random dim sum
//! topicrec --data-dir ./artifacts cities
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use topicrec::prelude::*;
//!
//! let store = ArtifactStore::open("./artifacts").unwrap();
//! let recommender = Recommender::from_store(&store, RecommenderConfig::default()).unwrap();
//!
//! let hits = recommender
//!     .recommend("late night tacos", "Phoenix", 5, Variant::Lsa, false)
//!     .unwrap();
//! for hit in hits {
//!     println!("{} {:.3}", hit.id, hit.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `topicrec-core` - vectors, corpus partitions, normalization, cosine ranking
//! - `topicrec-model` - TF-IDF weighter, LSA/NMF projectors, query vectorizer
//! - `topicrec-storage` - checksummed artifact store
//! - `topicrec-engine` - the `Recommender` facade

// Re-export core types
pub use topicrec_core::{
    normalize, rank,
    CorpusRow, CorpusTable, DocumentId, ScoredDocument,
    TermWeights, Variant, Vector,
    Error, Result,
};

// Re-export models
pub use topicrec_model::{
    LsaProjector, NmfOptions, NmfProjector, Projector, ProjectorArtifact,
    QueryVectorizer, TermWeighter, TfidfOptions, TfidfWeighter,
};

// Re-export storage
pub use topicrec_storage::{ArtifactFormat, ArtifactStore, StoreWriter};

// Re-export the facade
pub use topicrec_engine::{Recommender, RecommenderConfig, VariantSpace, DEFAULT_OVERSAMPLE_MARGIN};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, CorpusRow, CorpusTable, DocumentId, Error, QueryVectorizer,
        Recommender, RecommenderConfig, Result, ScoredDocument, Variant, VariantSpace, Vector,
    };
}
