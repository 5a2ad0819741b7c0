//! # topicrec Engine
//!
//! The retrieval facade: normalize the query, vectorize it in the chosen
//! latent space, rank the requested city's restaurants by cosine
//! similarity, and return the top N (or a random sample from the head of
//! the ranking).
//!
//! ```text
//! query ──normalize──> text ──vectorize──> z ─┐
//!                                             ├─rank──> ranking ──select──> top N
//! city ──────────────partition───────> rows ──┘
//! ```

pub mod config;
pub mod space;
pub mod select;
pub mod recommender;

pub use config::{RecommenderConfig, DEFAULT_OVERSAMPLE_MARGIN};
pub use space::VariantSpace;
pub use recommender::Recommender;
