use std::collections::BTreeMap;

use rand::Rng;
use topicrec_core::{
    normalize, normalize_bytes, rank_with_threshold, Error, Result, ScoredDocument, Variant,
};
use topicrec_model::{Loaded, QueryVectorizer};
use topicrec_storage::ArtifactStore;

use crate::config::RecommenderConfig;
use crate::select;
use crate::space::VariantSpace;

/// Recommends restaurants in a city for a free-text search.
///
/// Holds at most one [`VariantSpace`] per latent-space variant; a query in
/// one variant is only ever scored against that variant's corpus table.
/// All state is immutable after construction, so a shared `&Recommender`
/// serves concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommenderConfig,
    spaces: BTreeMap<Variant, VariantSpace>,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            spaces: BTreeMap::new(),
        }
    }

    /// Load every variant the store lists. The weighter is read once and
    /// shared by all variants.
    pub fn from_store(store: &ArtifactStore, config: RecommenderConfig) -> Result<Self> {
        let weighter = Loaded(store.load_weighter()?);
        let mut recommender = Self::new(config);
        for variant in store.variants() {
            let corpus = store.load_corpus(variant)?;
            let vectorizer =
                QueryVectorizer::load(&weighter, &store.projector_source(variant), corpus.dim())?;
            if vectorizer.variant() != variant {
                return Err(Error::ArtifactLoad(format!(
                    "projector listed as {} loaded as {}",
                    variant,
                    vectorizer.variant()
                )));
            }
            recommender.insert_space(VariantSpace::new(vectorizer, corpus)?);
        }
        Ok(recommender)
    }

    #[must_use]
    pub fn with_space(mut self, space: VariantSpace) -> Self {
        self.insert_space(space);
        self
    }

    /// Register a space, replacing any previous one of the same variant.
    pub fn insert_space(&mut self, space: VariantSpace) -> Option<VariantSpace> {
        self.spaces.insert(space.variant(), space)
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn space(&self, variant: Variant) -> Option<&VariantSpace> {
        self.spaces.get(&variant)
    }

    pub fn variants(&self) -> Vec<Variant> {
        self.spaces.keys().copied().collect()
    }

    fn space_for(&self, variant: Variant) -> Result<&VariantSpace> {
        self.spaces.get(&variant).ok_or_else(|| {
            Error::InvalidArgument(format!("variant {} is not loaded", variant))
        })
    }

    /// Score every restaurant of `city` against the query, best first.
    pub fn rank(&self, query_text: &str, city: &str, variant: Variant) -> Result<Vec<ScoredDocument>> {
        self.rank_normalized(&normalize(query_text), city, variant)
    }

    fn rank_normalized(
        &self,
        normalized: &str,
        city: &str,
        variant: Variant,
    ) -> Result<Vec<ScoredDocument>> {
        let space = self.space_for(variant)?;

        let query = space.vectorizer().vectorize(normalized)?;
        let partition = space.corpus().partition(city);
        if partition.is_empty() {
            tracing::warn!(city, %variant, "no restaurants for city");
        }

        let ranked = rank_with_threshold(&query, &partition, self.config.parallel_threshold)?;
        tracing::debug!(
            query = %normalized,
            city,
            %variant,
            candidates = ranked.len(),
            "ranked city partition"
        );
        Ok(ranked)
    }

    /// Top `top_n` restaurants of `city` for `query_text`.
    ///
    /// With `randomize`, returns a random sample of `top_n` drawn from the
    /// first `top_n + oversample_margin` ranked restaurants instead.
    pub fn recommend(
        &self,
        query_text: &str,
        city: &str,
        top_n: usize,
        variant: Variant,
        randomize: bool,
    ) -> Result<Vec<ScoredDocument>> {
        self.recommend_with_rng(query_text, city, top_n, variant, randomize, &mut rand::rng())
    }

    /// [`recommend`](Self::recommend) drawing randomized samples from `rng`.
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        query_text: &str,
        city: &str,
        top_n: usize,
        variant: Variant,
        randomize: bool,
        rng: &mut R,
    ) -> Result<Vec<ScoredDocument>> {
        check_top_n(top_n)?;
        let ranked = self.rank(query_text, city, variant)?;
        Ok(self.pick(ranked, top_n, randomize, rng))
    }

    /// [`recommend`](Self::recommend) for a query that arrives as raw bytes.
    /// Malformed UTF-8 is an `InvalidInput` error.
    pub fn recommend_bytes(
        &self,
        query: &[u8],
        city: &str,
        top_n: usize,
        variant: Variant,
        randomize: bool,
    ) -> Result<Vec<ScoredDocument>> {
        check_top_n(top_n)?;
        let normalized = normalize_bytes(query)?;
        let ranked = self.rank_normalized(&normalized, city, variant)?;
        Ok(self.pick(ranked, top_n, randomize, &mut rand::rng()))
    }

    fn pick<R: Rng + ?Sized>(
        &self,
        ranked: Vec<ScoredDocument>,
        top_n: usize,
        randomize: bool,
        rng: &mut R,
    ) -> Vec<ScoredDocument> {
        if randomize {
            select::sample_head(ranked, top_n, self.config.oversample_margin, rng)
        } else {
            select::top_n(ranked, top_n)
        }
    }
}

fn check_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(Error::InvalidArgument("top_n must be positive".to_string()));
    }
    Ok(())
}
