// Brute-force cosine ranking over a city partition
use rayon::prelude::*;
use std::cmp::Ordering;

use crate::corpus::Partition;
use crate::document::{DocumentId, ScoredDocument};
use crate::error::{Error, Result};
use crate::vector::Vector;

/// Partitions with at least this many rows are scored on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Rank every document of `partition` by cosine similarity to `query`.
///
/// Scores are `dot(q, v) / (|q| * |v|)`, or exactly 0.0 when either norm is
/// zero (an out-of-vocabulary query projects to the zero vector). A
/// non-finite score is also reported as 0.0. The result
/// is sorted descending with a stable sort, so equal scores keep partition
/// order.
pub fn rank(query: &Vector, partition: &Partition<'_>) -> Result<Vec<ScoredDocument>> {
    rank_with_threshold(query, partition, DEFAULT_PARALLEL_THRESHOLD)
}

/// [`rank`] with an explicit size at which scoring goes parallel.
/// The output does not depend on which path is taken.
pub fn rank_with_threshold(
    query: &Vector,
    partition: &Partition<'_>,
    parallel_threshold: usize,
) -> Result<Vec<ScoredDocument>> {
    if query.dim() != partition.dim() {
        return Err(Error::DimensionMismatch {
            expected: partition.dim(),
            actual: query.dim(),
        });
    }

    let query_norm = query.norm();
    let score = |(id, vector): (&DocumentId, &Vector)| {
        ScoredDocument::new(id.clone(), cosine_with_norm(query, query_norm, vector))
    };

    let mut scored: Vec<ScoredDocument> = if partition.len() >= parallel_threshold {
        (0..partition.len())
            .into_par_iter()
            .map(|i| score(partition.entry(i)))
            .collect()
    } else {
        partition.iter().map(score).collect()
    };

    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ok(scored)
}

#[inline]
fn cosine_with_norm(query: &Vector, query_norm: f32, other: &Vector) -> f32 {
    let other_norm = other.norm();
    if query_norm == 0.0 || other_norm == 0.0 {
        return 0.0;
    }
    let score = query.dot(other) / (query_norm * other_norm);
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusTable;
    use crate::document::CorpusRow;

    fn austin_table() -> CorpusTable {
        CorpusTable::new(
            3,
            vec![
                CorpusRow::new("A", Vector::new(vec![1.0, 0.0, 0.0]), "Austin"),
                CorpusRow::new("B", Vector::new(vec![0.0, 1.0, 0.0]), "Austin"),
                CorpusRow::new("C", Vector::new(vec![0.9, 0.1, 0.0]), "Austin"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rank_descending() {
        let table = austin_table();
        let ranked = rank(&Vector::new(vec![1.0, 0.0, 0.0]), &table.partition("Austin")).unwrap();

        let ids: Vec<String> = ranked.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert!((ranked[1].score - 0.9939).abs() < 1e-3);
        assert!(ranked[2].score.abs() < 1e-6);
    }

    #[test]
    fn test_zero_query_scores_zero_without_nan() {
        let table = austin_table();
        let ranked = rank(&Vector::zeros(3), &table.partition("Austin")).unwrap();
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.score == 0.0));
        // all tied, so table order survives
        let ids: Vec<String> = ranked.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_zero_corpus_vector_scores_zero() {
        let table = CorpusTable::new(
            2,
            vec![
                CorpusRow::new("empty", Vector::zeros(2), "Reno"),
                CorpusRow::new("x", Vector::new(vec![1.0, 1.0]), "Reno"),
            ],
        )
        .unwrap();
        let ranked = rank(&Vector::new(vec![1.0, 0.0]), &table.partition("Reno")).unwrap();
        assert_eq!(ranked[0].id, DocumentId::from("x"));
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_ties_keep_partition_order() {
        let rows = (0..6u64)
            .map(|i| CorpusRow::new(i, Vector::new(vec![1.0, (i % 2) as f32]), "Tempe"))
            .collect();
        let table = CorpusTable::new(2, rows).unwrap();
        let ranked = rank(&Vector::new(vec![1.0, 0.0]), &table.partition("Tempe")).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2", "4", "1", "3", "5"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows = (0..500u64)
            .map(|i| {
                let x = i as f32;
                CorpusRow::new(i, Vector::new(vec![(x * 0.37).sin(), (x * 0.11).cos(), 0.25]), "Madison")
            })
            .collect();
        let table = CorpusTable::new(3, rows).unwrap();
        let query = Vector::new(vec![0.3, -0.2, 0.9]);
        let partition = table.partition("Madison");

        let sequential = rank_with_threshold(&query, &partition, usize::MAX).unwrap();
        let parallel = rank_with_threshold(&query, &partition, 1).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_non_finite_query_keeps_order() {
        let table = austin_table();
        let query = Vector::new(vec![f32::NAN, 1.0, 0.0]);
        let ranked = rank(&query, &table.partition("Austin")).unwrap();
        assert!(ranked.iter().all(|r| r.score == 0.0));
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let table = austin_table();
        let err = rank(&Vector::zeros(10), &table.partition("Austin")).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 3, actual: 10 });
    }

    #[test]
    fn test_empty_partition() {
        let table = austin_table();
        let ranked = rank(&Vector::new(vec![1.0, 0.0, 0.0]), &table.partition("Boston")).unwrap();
        assert!(ranked.is_empty());
    }
}
