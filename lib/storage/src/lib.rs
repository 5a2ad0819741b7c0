//! # topicrec Storage
//!
//! Reads (and, for offline tooling, writes) the artifact directory the
//! recommender starts from: the TF-IDF weighter, one projector per
//! latent-space variant, and the corpus table pre-encoded through each.
//! Every file is checksummed in `manifest.json`.

pub mod codec;
pub mod manifest;
pub mod store;

pub use codec::ArtifactFormat;
pub use manifest::{ArtifactEntry, StoreManifest, VariantEntry, MANIFEST_FILE};
pub use store::{ArtifactStore, CorpusArtifact, StoreWriter, StoredProjector, StoredWeighter};
