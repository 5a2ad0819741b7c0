//! # topicrec Model
//!
//! Query-side models for the topicrec recommender.
//!
//! - [`TfidfWeighter`] - TF-IDF term weighting over a trained vocabulary
//! - [`LsaProjector`] - truncated-SVD projection (may be negative)
//! - [`NmfProjector`] - non-negative projection solved by coordinate descent
//! - [`QueryVectorizer`] - weighter + projector pair bound to one corpus space
//!
//! Training either model is out of scope; artifacts are produced offline
//! and handed in through [`WeighterSource`] / [`ProjectorSource`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use topicrec_model::{LsaProjector, QueryVectorizer, TfidfOptions, TfidfWeighter};
//!
//! let weighter = TfidfWeighter::new(
//!     vec!["ramen".into(), "taco".into()],
//!     vec![1.0, 1.0],
//!     TfidfOptions::default(),
//! ).unwrap();
//! let lsa = LsaProjector::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
//!
//! let vectorizer = QueryVectorizer::new(Arc::new(weighter), Arc::new(lsa), 2).unwrap();
//! let query = vectorizer.vectorize("taco").unwrap();
//! assert_eq!(query.as_slice(), &[0.0, 1.0]);
//! ```

pub mod weighter;
pub mod projector;
pub mod lsa;
pub mod nmf;
pub mod artifact;
pub mod vectorizer;

pub use weighter::{TermWeighter, TfidfOptions, TfidfParts, TfidfWeighter};
pub use projector::{Projector, ProjectorArtifact};
pub use lsa::{LsaParts, LsaProjector};
pub use nmf::{NmfOptions, NmfParts, NmfProjector};
pub use artifact::{Loaded, ProjectorSource, WeighterSource};
pub use vectorizer::QueryVectorizer;
