// Integration tests for topicrec
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use topicrec::prelude::*;
use topicrec::{
    ArtifactFormat, LsaProjector, NmfOptions, NmfProjector, Projector, StoreWriter,
    TermWeighter, TfidfOptions, TfidfWeighter,
};

const VOCAB: &[&str] = &[
    "pizza", "pasta", "sushi", "ramen", "taco", "burrito", "steak", "burger", "salad", "vegan",
    "spicy", "cheap",
];

fn weighter() -> TfidfWeighter {
    let idf = (0..VOCAB.len()).map(|i| 1.0 + i as f32 * 0.05).collect();
    TfidfWeighter::new(
        VOCAB.iter().map(|s| s.to_string()).collect(),
        idf,
        TfidfOptions::default(),
    )
    .unwrap()
}

/// Three topics: italian, asian, mexican/american
fn topic_rows() -> Vec<Vec<f32>> {
    vec![
        vec![0.7, 0.7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 0.1, 0.0, 0.0, 0.1],
        vec![0.0, 0.0, 0.7, 0.7, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1, 0.2, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.6, 0.6, 0.3, 0.3, 0.0, 0.0, 0.2, 0.2],
    ]
}

fn lsa() -> LsaProjector {
    let mut rows = topic_rows();
    // a signed direction, as truncated SVD produces
    rows[2][8] = -0.2;
    LsaProjector::from_rows(rows).unwrap()
}

fn nmf() -> NmfProjector {
    NmfProjector::from_rows(topic_rows(), NmfOptions::default()).unwrap()
}

fn corpus(non_negative: bool) -> CorpusTable {
    let mut rows = Vec::new();
    for i in 0..60u64 {
        let x = i as f32;
        let mut v = vec![(x * 0.7).sin(), (x * 0.3).cos(), (x * 1.3).sin() * 0.5];
        if non_negative {
            v.iter_mut().for_each(|c| *c = c.abs());
        }
        rows.push(CorpusRow::new(format!("lv-{}", i), Vector::new(v), "Las Vegas"));
    }
    rows.push(CorpusRow::new("A", Vector::new(vec![1.0, 0.0, 0.0]), "Austin"));
    rows.push(CorpusRow::new("B", Vector::new(vec![0.0, 1.0, 0.0]), "Austin"));
    rows.push(CorpusRow::new("C", Vector::new(vec![0.9, 0.1, 0.0]), "Austin"));
    for i in 0..4u64 {
        rows.push(CorpusRow::new(
            format!("to-{}", i),
            Vector::new(vec![0.2, 0.3 + i as f32 * 0.1, 0.6]),
            "Toronto",
        ));
    }
    CorpusTable::new(3, rows).unwrap()
}

fn store(dir: &std::path::Path) -> ArtifactStore {
    StoreWriter::new(dir)
        .weighter(weighter())
        .variant(lsa(), &corpus(false))
        .variant(nmf(), &corpus(true))
        .write()
        .unwrap()
}

fn recommender(dir: &std::path::Path) -> Recommender {
    Recommender::from_store(&store(dir), RecommenderConfig::default()).unwrap()
}

#[test]
fn test_store_round_trip_loads_both_variants() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    assert_eq!(r.variants(), vec![Variant::Lsa, Variant::Nmf]);
    assert_eq!(r.space(Variant::Nmf).unwrap().corpus().city_len("Las Vegas"), 60);
}

#[test]
fn test_deterministic_mode_repeats_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    for variant in Variant::ALL {
        let first = r.recommend("spicy ramen", "Las Vegas", 10, variant, false).unwrap();
        let second = r.recommend("spicy ramen", "Las Vegas", 10, variant, false).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_results_stay_in_city() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    for city in ["Las Vegas", "Austin", "Toronto"] {
        for variant in Variant::ALL {
            let hits = r.recommend("cheap tacos and burritos", city, 50, variant, false).unwrap();
            let corpus = r.space(variant).unwrap().corpus();
            assert!(hits.iter().all(|h| corpus.contains(city, &h.id)));
        }
    }
}

#[test]
fn test_top_n_bound_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());

    let hits = r.recommend("pizza pasta", "Las Vegas", 7, Variant::Lsa, false).unwrap();
    assert_eq!(hits.len(), 7);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));

    // Toronto only has four restaurants
    let hits = r.recommend("pizza pasta", "Toronto", 7, Variant::Lsa, false).unwrap();
    assert_eq!(hits.len(), 4);
}

#[test]
fn test_out_of_vocabulary_query_scores_zero() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    for variant in Variant::ALL {
        let hits = r.recommend("zzzzqqqxyz", "Toronto", 3, variant, false).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.score == 0.0));
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["to-0", "to-1", "to-2"]);
    }
}

#[test]
fn test_unknown_city_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    let hits = r.recommend("pizza", "Nonexistent City", 5, Variant::Lsa, false).unwrap();
    assert!(hits.is_empty());
    let hits = r.recommend("pizza", "Nonexistent City", 5, Variant::Nmf, true).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_zero_top_n_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    let err = r.recommend("sushi", "Austin", 0, Variant::Lsa, false).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_randomized_mode_samples_from_head() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    let mut rng = StdRng::seed_from_u64(2024);

    for variant in Variant::ALL {
        let ranked = r.rank("spicy sushi", "Las Vegas", variant).unwrap();
        let head: HashSet<DocumentId> = ranked[..5 + 20].iter().map(|h| h.id.clone()).collect();

        let mut seen = HashSet::new();
        for _ in 0..40 {
            let hits = r
                .recommend_with_rng("spicy sushi", "Las Vegas", 5, variant, true, &mut rng)
                .unwrap();
            assert_eq!(hits.len(), 5);
            for hit in &hits {
                assert!(head.contains(&hit.id), "{} outside the sampling pool", hit.id);
                seen.insert(hit.id.clone());
            }
        }
        // 40 draws of 5 from a pool of 25 should reach past the top 5
        assert!(seen.len() > 5);
    }
}

#[test]
fn test_randomized_mode_with_small_city() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());
    let hits = r.recommend("steak", "Austin", 10, Variant::Lsa, true).unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_variants_score_independently() {
    let dir = tempfile::tempdir().unwrap();
    let r = recommender(dir.path());

    let lsa = r.space(Variant::Lsa).unwrap();
    let nmf = r.space(Variant::Nmf).unwrap();
    let q_lsa = lsa.vectorizer().vectorize("vegan salad").unwrap();
    let q_nmf = nmf.vectorizer().vectorize("vegan salad").unwrap();
    assert!(q_lsa.as_slice().iter().any(|c| *c < 0.0));
    assert!(q_nmf.as_slice().iter().all(|c| *c >= 0.0));

    let expected: Vec<f32> = nmf
        .corpus()
        .partition("Austin")
        .iter()
        .map(|(_, v)| q_nmf.cosine_similarity(v))
        .collect();
    let mut hits = r.recommend("vegan salad", "Austin", 3, Variant::Nmf, false).unwrap();
    hits.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    for (hit, want) in hits.iter().zip(expected) {
        assert!((hit.score - want).abs() < 1e-6);
    }
}

#[derive(Debug)]
struct FixedQuery(Vector);

impl Projector for FixedQuery {
    fn variant(&self) -> Variant {
        Variant::Lsa
    }
    fn input_dim(&self) -> usize {
        VOCAB.len()
    }
    fn output_dim(&self) -> usize {
        self.0.dim()
    }
    fn project(&self, _weights: &topicrec::TermWeights) -> Result<Vector> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_austin_scenario() {
    let weighter: Arc<dyn TermWeighter> = Arc::new(weighter());
    let projector: Arc<dyn Projector> = Arc::new(FixedQuery(Vector::new(vec![1.0, 0.0, 0.0])));
    let corpus = CorpusTable::new(
        3,
        vec![
            CorpusRow::new("A", Vector::new(vec![1.0, 0.0, 0.0]), "Austin"),
            CorpusRow::new("B", Vector::new(vec![0.0, 1.0, 0.0]), "Austin"),
            CorpusRow::new("C", Vector::new(vec![0.9, 0.1, 0.0]), "Austin"),
        ],
    )
    .unwrap();
    let vectorizer = QueryVectorizer::new(weighter, projector, 3).unwrap();
    let r = Recommender::default().with_space(VariantSpace::new(vectorizer, corpus).unwrap());

    let hits = r.recommend("anything at all", "Austin", 2, Variant::Lsa, false).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id.as_str(), "A");
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert_eq!(hits[1].id.as_str(), "C");
    assert!((hits[1].score - 0.994).abs() < 1e-3);
}

#[test]
fn test_projector_dimension_mismatch_at_load() {
    let dir = tempfile::tempdir().unwrap();
    // K=3 projector written next to a K=2 corpus
    let narrow = CorpusTable::new(2, vec![CorpusRow::new("x", Vector::new(vec![1.0, 0.0]), "Reno")])
        .unwrap();
    let store = StoreWriter::new(dir.path())
        .format(ArtifactFormat::Json)
        .weighter(weighter())
        .variant(lsa(), &narrow)
        .write()
        .unwrap();
    let err = Recommender::from_store(&store, RecommenderConfig::default()).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[test]
fn test_missing_artifact_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(dir.path());
    let projector_file = &store.manifest().variant(Variant::Nmf).unwrap().projector.file;
    std::fs::remove_file(dir.path().join(projector_file)).unwrap();

    let err = Recommender::from_store(&store, RecommenderConfig::default()).unwrap_err();
    assert!(matches!(err, Error::ArtifactLoad(_)));
}

#[test]
fn test_concurrent_recommend() {
    let dir = tempfile::tempdir().unwrap();
    let r = Arc::new(recommender(dir.path()));
    let expected = r.recommend("burger steak", "Las Vegas", 5, Variant::Nmf, false).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let r = Arc::clone(&r);
            std::thread::spawn(move || r.recommend("burger steak", "Las Vegas", 5, Variant::Nmf, false))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}

#[test]
fn test_corrupted_artifact_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(dir.path());
    let corpus_file = &store.manifest().variant(Variant::Lsa).unwrap().corpus.file;
    let path = dir.path().join(corpus_file);
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] ^= 0xff;
    std::fs::write(&path, bytes).unwrap();

    let reopened = ArtifactStore::open(dir.path()).unwrap();
    let err = Recommender::from_store(&reopened, RecommenderConfig::default()).unwrap_err();
    match err {
        Error::ArtifactLoad(msg) => assert!(msg.contains("checksum mismatch")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_plural_queries_match_singular_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    let weighter = TfidfWeighter::new(
        vec!["steak".into(), "noodle".into(), "taco".into(), "sandwich".into()],
        vec![1.0, 1.0, 1.0, 1.0],
        TfidfOptions::default(),
    )
    .unwrap();
    let identity = LsaProjector::from_rows(vec![
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0],
    ])
    .unwrap();
    let corpus = CorpusTable::new(
        4,
        vec![
            CorpusRow::new("grill", Vector::new(vec![1.0, 0.0, 0.0, 0.0]), "Phoenix"),
            CorpusRow::new("noodle-bar", Vector::new(vec![0.0, 1.0, 0.0, 0.0]), "Phoenix"),
            CorpusRow::new("deli", Vector::new(vec![0.0, 0.0, 0.0, 1.0]), "Phoenix"),
            CorpusRow::new("taqueria", Vector::new(vec![0.0, 0.0, 1.0, 0.0]), "Phoenix"),
        ],
    )
    .unwrap();
    let store = StoreWriter::new(dir.path())
        .weighter(weighter)
        .variant(identity, &corpus)
        .write()
        .unwrap();
    let r = Recommender::from_store(&store, RecommenderConfig::default()).unwrap();

    for (query, want) in [
        ("Best TACOS!", "taqueria"),
        ("spicy noodles", "noodle-bar"),
        ("(sandwiches)", "deli"),
    ] {
        let hits = r.recommend(query, "Phoenix", 1, Variant::Lsa, false).unwrap();
        assert_eq!(hits[0].id.as_str(), want, "query {:?}", query);
        assert!((hits[0].score - 1.0).abs() < 1e-6, "query {:?}", query);
    }
}
