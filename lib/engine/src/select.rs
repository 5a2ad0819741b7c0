// Head selection over a full ranking
use rand::Rng;
use topicrec_core::ScoredDocument;

/// The first `top_n` entries, in ranked order.
pub fn top_n(mut ranked: Vec<ScoredDocument>, top_n: usize) -> Vec<ScoredDocument> {
    ranked.truncate(top_n);
    ranked
}

/// A uniform sample without replacement of `min(top_n, pool)` entries from
/// the first `top_n + margin` of the ranking. Sample order is random.
pub fn sample_head<R: Rng + ?Sized>(
    mut ranked: Vec<ScoredDocument>,
    top_n: usize,
    margin: usize,
    rng: &mut R,
) -> Vec<ScoredDocument> {
    ranked.truncate(top_n.saturating_add(margin));
    let amount = top_n.min(ranked.len());

    let mut pool: Vec<Option<ScoredDocument>> = ranked.into_iter().map(Some).collect();
    rand::seq::index::sample(rng, pool.len(), amount)
        .into_iter()
        .filter_map(|i| pool[i].take())
        .collect()
}
