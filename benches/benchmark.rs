// Performance benchmarks for ranking and end-to-end recommendation
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::sync::Arc;
use topicrec::prelude::*;
use topicrec::{LsaProjector, Projector, TermWeighter, TfidfOptions, TfidfWeighter};
use topicrec_core::rank::rank_with_threshold;

const DIM: usize = 10;
const VOCAB: usize = 2000;

fn random_vector(rng: &mut StdRng, dim: usize) -> Vector {
    Vector::new((0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect())
}

fn corpus(size: usize) -> CorpusTable {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = (0..size)
        .map(|i| {
            let city = if i % 4 == 0 { "Toronto" } else { "Las Vegas" };
            CorpusRow::new(i as u64, random_vector(&mut rng, DIM), city)
        })
        .collect();
    CorpusTable::new(DIM, rows).unwrap()
}

fn recommender(size: usize) -> Recommender {
    let mut rng = StdRng::seed_from_u64(11);
    let terms: Vec<String> = (0..VOCAB).map(|i| format!("term{}", i)).collect();
    let idf = (0..VOCAB).map(|_| rng.random_range(1.0f32..8.0f32)).collect();
    let weighter: Arc<dyn TermWeighter> =
        Arc::new(TfidfWeighter::new(terms, idf, TfidfOptions::default()).unwrap());
    let components = (0..DIM * VOCAB).map(|_| rng.random_range(-0.1f32..0.1f32)).collect();
    let projector: Arc<dyn Projector> =
        Arc::new(LsaProjector::new(DIM, VOCAB, components).unwrap());
    let vectorizer = QueryVectorizer::new(weighter, projector, DIM).unwrap();
    Recommender::default().with_space(VariantSpace::new(vectorizer, corpus(size)).unwrap())
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let mut rng = StdRng::seed_from_u64(3);
    let query = random_vector(&mut rng, DIM);

    for size in [1000, 10000, 100000].iter() {
        let table = corpus(*size);
        let partition = table.partition("Las Vegas");
        group.bench_with_input(BenchmarkId::new("sequential", size), size, |b, _| {
            b.iter(|| rank_with_threshold(black_box(&query), &partition, usize::MAX).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            b.iter(|| rank_with_threshold(black_box(&query), &partition, 0).unwrap());
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let r = recommender(50000);
    let query = "term12 term7 term1999 term12 and a few unknown words";

    group.bench_function("deterministic", |b| {
        b.iter(|| r.recommend(black_box(query), "Las Vegas", 10, Variant::Lsa, false).unwrap());
    });
    group.bench_function("randomized", |b| {
        b.iter(|| r.recommend(black_box(query), "Las Vegas", 10, Variant::Lsa, true).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_rank, benchmark_recommend);
criterion_main!(benches);
