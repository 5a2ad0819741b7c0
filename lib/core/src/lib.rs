//! # topicrec Core
//!
//! Core library for the topicrec restaurant recommender.
//!
//! This crate provides the data model and the scoring half of the query
//! pipeline:
//!
//! - [`normalize`] - deterministic text normalization (NFKC, lowercase, lemmatize)
//! - [`Vector`] - dense latent vector with dot/norm kernels
//! - [`TermWeights`] - sparse term-weight vector over a trained vocabulary
//! - [`CorpusTable`] - per-variant document vectors partitioned by city
//! - [`rank`] - exact cosine ranking of a city partition
//!
//! ## Example
//!
//! ```rust
//! use topicrec_core::{rank, CorpusRow, CorpusTable, Vector};
//!
//! let table = CorpusTable::new(3, vec![
//!     CorpusRow::new("A", Vector::new(vec![1.0, 0.0, 0.0]), "Austin"),
//!     CorpusRow::new("B", Vector::new(vec![0.0, 1.0, 0.0]), "Austin"),
//!     CorpusRow::new("C", Vector::new(vec![0.9, 0.1, 0.0]), "Austin"),
//! ]).unwrap();
//!
//! let query = Vector::new(vec![1.0, 0.0, 0.0]);
//! let ranked = rank(&query, &table.partition("Austin")).unwrap();
//! assert_eq!(ranked[0].id.to_string(), "A");
//! assert_eq!(ranked[1].id.to_string(), "C");
//! ```

pub mod error;
pub mod vector;
pub mod sparse;
pub mod document;
pub mod variant;
pub mod normalize;
pub mod corpus;
pub mod rank;

/// Dot product and norm kernels on `f32` slices
pub mod simd;

pub use error::{Error, Result};
pub use vector::Vector;
pub use sparse::TermWeights;
pub use document::{CorpusRow, DocumentId, ScoredDocument};
pub use variant::Variant;
pub use normalize::{lemmatize, normalize, normalize_bytes};
pub use corpus::{CorpusTable, CorpusTableData, Partition};
pub use rank::{rank, rank_with_threshold, DEFAULT_PARALLEL_THRESHOLD};
