//! File-backed artifact store.
//!
//! Layout of a store directory:
//!
//! ```text
//! <root>/manifest.json      StoreManifest
//! <root>/tfidf.bin          TfidfWeighter
//! <root>/lsa_model.bin      ProjectorArtifact::Lsa
//! <root>/doc_topic_lsa.bin  CorpusArtifact (variant = lsa)
//! <root>/nmf_model.bin      ...
//! <root>/doc_topic_nmf.bin
//! ```

use anyhow::{anyhow, bail, Context};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use topicrec_core::{CorpusTable, CorpusTableData, Error, Result, Variant};
use topicrec_model::{
    Projector, ProjectorArtifact, ProjectorSource, TermWeighter, TfidfWeighter, WeighterSource,
};

use crate::codec::ArtifactFormat;
use crate::manifest::{ArtifactEntry, StoreManifest, VariantEntry, FORMAT_VERSION, MANIFEST_FILE};

/// Corpus table tagged with the variant its vectors were encoded through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusArtifact {
    pub variant: Variant,
    pub table: CorpusTableData,
}

fn to_load_error(err: anyhow::Error) -> Error {
    Error::ArtifactLoad(format!("{:#}", err))
}

/// Read `entry` under `root`, verify its checksum and decode it.
fn read_verified<T: DeserializeOwned>(root: &Path, entry: &ArtifactEntry) -> anyhow::Result<T> {
    let path = root.join(&entry.file);
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    if !entry.matches(&bytes) {
        bail!(
            "checksum mismatch for {} (expected sha256 {})",
            path.display(),
            entry.sha256
        );
    }
    ArtifactFormat::from_path(&path)
        .decode(&bytes)
        .with_context(|| format!("decoding {}", path.display()))
}

/// An opened store directory. Opening reads only the manifest; artifacts
/// are read and verified when loaded.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    manifest: StoreManifest,
}

impl ArtifactStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest = Self::read_manifest(&root).map_err(to_load_error)?;
        tracing::info!(
            root = %root.display(),
            variants = manifest.variants.len(),
            created_at = %manifest.created_at,
            "artifact store opened"
        );
        Ok(Self { root, manifest })
    }

    fn read_manifest(root: &Path) -> anyhow::Result<StoreManifest> {
        let path = root.join(MANIFEST_FILE);
        let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let manifest: StoreManifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        if manifest.format_version != FORMAT_VERSION {
            bail!(
                "unsupported store format version {} (expected {})",
                manifest.format_version,
                FORMAT_VERSION
            );
        }
        Ok(manifest)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    pub fn variants(&self) -> Vec<Variant> {
        self.manifest.variants.keys().copied().collect()
    }

    fn variant_entry(&self, variant: Variant) -> Result<&VariantEntry> {
        self.manifest.variant(variant).ok_or_else(|| {
            Error::ArtifactLoad(format!(
                "store {} has no {} artifacts",
                self.root.display(),
                variant
            ))
        })
    }

    pub fn load_weighter(&self) -> Result<Arc<dyn TermWeighter>> {
        let weighter: TfidfWeighter =
            read_verified(&self.root, &self.manifest.weighter).map_err(to_load_error)?;
        Ok(Arc::new(weighter))
    }

    pub fn load_projector(&self, variant: Variant) -> Result<Arc<dyn Projector>> {
        let entry = self.variant_entry(variant)?;
        let artifact: ProjectorArtifact =
            read_verified(&self.root, &entry.projector).map_err(to_load_error)?;
        if artifact.variant() != variant {
            return Err(Error::ArtifactLoad(format!(
                "{} holds a {} projector, manifest lists it as {}",
                entry.projector.file,
                artifact.variant(),
                variant
            )));
        }
        let projector = artifact.into_projector();
        if projector.output_dim() != entry.dim {
            return Err(Error::DimensionMismatch {
                expected: entry.dim,
                actual: projector.output_dim(),
            });
        }
        Ok(projector)
    }

    pub fn load_corpus(&self, variant: Variant) -> Result<CorpusTable> {
        let entry = self.variant_entry(variant)?;
        let artifact: CorpusArtifact =
            read_verified(&self.root, &entry.corpus).map_err(to_load_error)?;
        if artifact.variant != variant {
            return Err(Error::ArtifactLoad(format!(
                "{} holds {} corpus vectors, manifest lists it as {}",
                entry.corpus.file, artifact.variant, variant
            )));
        }
        if artifact.table.dim != entry.dim {
            return Err(Error::DimensionMismatch {
                expected: entry.dim,
                actual: artifact.table.dim,
            });
        }
        let table = CorpusTable::from_data(artifact.table)?;
        tracing::info!(%variant, rows = table.len(), cities = table.cities().len(), "corpus loaded");
        Ok(table)
    }

    pub fn weighter_source(&self) -> StoredWeighter<'_> {
        StoredWeighter { store: self }
    }

    pub fn projector_source(&self, variant: Variant) -> StoredProjector<'_> {
        StoredProjector { store: self, variant }
    }
}

/// [`WeighterSource`] reading the store's TF-IDF artifact
#[derive(Debug, Clone, Copy)]
pub struct StoredWeighter<'a> {
    store: &'a ArtifactStore,
}

impl WeighterSource for StoredWeighter<'_> {
    fn load(&self) -> Result<Arc<dyn TermWeighter>> {
        self.store.load_weighter()
    }
}

/// [`ProjectorSource`] reading one variant's projector artifact
#[derive(Debug, Clone, Copy)]
pub struct StoredProjector<'a> {
    store: &'a ArtifactStore,
    variant: Variant,
}

impl ProjectorSource for StoredProjector<'_> {
    fn load(&self) -> Result<Arc<dyn Projector>> {
        self.store.load_projector(self.variant)
    }
}

/// Writes a complete store directory. Used by offline tooling and tests;
/// the recommender itself only reads stores.
#[derive(Debug)]
pub struct StoreWriter {
    root: PathBuf,
    format: ArtifactFormat,
    weighter: Option<TfidfWeighter>,
    variants: BTreeMap<Variant, (ProjectorArtifact, CorpusTableData)>,
}

impl StoreWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            format: ArtifactFormat::default(),
            weighter: None,
            variants: BTreeMap::new(),
        }
    }

    pub fn format(mut self, format: ArtifactFormat) -> Self {
        self.format = format;
        self
    }

    pub fn weighter(mut self, weighter: TfidfWeighter) -> Self {
        self.weighter = Some(weighter);
        self
    }

    /// Add one variant's projector and the corpus encoded through it.
    pub fn variant(mut self, projector: impl Into<ProjectorArtifact>, corpus: &CorpusTable) -> Self {
        let projector = projector.into();
        self.variants
            .insert(projector.variant(), (projector, corpus.to_data()));
        self
    }

    pub fn write(self) -> anyhow::Result<ArtifactStore> {
        let weighter = self
            .weighter
            .ok_or_else(|| anyhow!("a store needs a term weighter"))?;
        if self.variants.is_empty() {
            bail!("a store needs at least one latent-space variant");
        }
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating {}", self.root.display()))?;

        let ext = self.format.extension();
        let weighter_entry =
            write_artifact(&self.root, &format!("tfidf.{}", ext), self.format, &weighter)?;

        let mut variants = BTreeMap::new();
        for (variant, (projector, table)) in self.variants {
            let dim = table.dim;
            let projector_entry = write_artifact(
                &self.root,
                &format!("{}_model.{}", variant, ext),
                self.format,
                &projector,
            )?;
            let corpus_entry = write_artifact(
                &self.root,
                &format!("doc_topic_{}.{}", variant, ext),
                self.format,
                &CorpusArtifact { variant, table },
            )?;
            variants.insert(
                variant,
                VariantEntry {
                    dim,
                    projector: projector_entry,
                    corpus: corpus_entry,
                },
            );
        }

        let manifest = StoreManifest {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            weighter: weighter_entry,
            variants,
        };
        let bytes = serde_json::to_vec_pretty(&manifest)?;
        write_atomic(&self.root.join(MANIFEST_FILE), &bytes)?;

        tracing::info!(root = %self.root.display(), "artifact store written");
        Ok(ArtifactStore {
            root: self.root,
            manifest,
        })
    }
}

fn write_artifact<T: Serialize>(
    root: &Path,
    file: &str,
    format: ArtifactFormat,
    value: &T,
) -> anyhow::Result<ArtifactEntry> {
    let bytes = format
        .encode(value)
        .with_context(|| format!("encoding {}", file))?;
    write_atomic(&root.join(file), &bytes)?;
    Ok(ArtifactEntry::for_bytes(file, &bytes))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(bytes))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
