use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::document::{CorpusRow, DocumentId};
use crate::error::{Error, Result};
use crate::vector::Vector;

/// Precomputed latent vectors for one variant, partitioned by city.
///
/// Row order is the order rows were supplied in and is the tie-breaker for
/// every ranking built on top of this table. The table is immutable once
/// constructed.
#[derive(Debug, Clone)]
pub struct CorpusTable {
    dim: usize,
    rows: Vec<CorpusRow>,
    // city -> row positions, ascending
    by_city: AHashMap<String, Vec<usize>>,
    // cities in first-seen order
    cities: Vec<String>,
}

/// Serialized form of a corpus table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusTableData {
    pub dim: usize,
    pub rows: Vec<CorpusRow>,
}

impl CorpusTable {
    /// Build a table whose every vector must have exactly `dim` components.
    pub fn new(dim: usize, rows: Vec<CorpusRow>) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidInput(
                "corpus vector dimensionality must be positive".to_string(),
            ));
        }

        let mut seen: AHashSet<&DocumentId> = AHashSet::with_capacity(rows.len());
        for row in &rows {
            if row.vector.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: row.vector.dim(),
                });
            }
            if !row.vector.as_slice().iter().all(|c| c.is_finite()) {
                return Err(Error::InvalidInput(format!(
                    "corpus vector for {} has a non-finite component",
                    row.id
                )));
            }
            if !seen.insert(&row.id) {
                return Err(Error::InvalidInput(format!(
                    "duplicate document id in corpus: {}",
                    row.id
                )));
            }
        }

        let mut by_city: AHashMap<String, Vec<usize>> = AHashMap::new();
        let mut cities = Vec::new();
        for (pos, row) in rows.iter().enumerate() {
            by_city
                .entry(row.city.clone())
                .or_insert_with(|| {
                    cities.push(row.city.clone());
                    Vec::new()
                })
                .push(pos);
        }

        tracing::debug!(rows = rows.len(), cities = cities.len(), dim, "corpus table built");

        Ok(Self {
            dim,
            rows,
            by_city,
            cities,
        })
    }

    pub fn from_data(data: CorpusTableData) -> Result<Self> {
        Self::new(data.dim, data.rows)
    }

    pub fn to_data(&self) -> CorpusTableData {
        CorpusTableData {
            dim: self.dim,
            rows: self.rows.clone(),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct city labels in first-seen order.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn city_len(&self, city: &str) -> usize {
        self.by_city.get(city).map_or(0, Vec::len)
    }

    pub fn contains(&self, city: &str, id: &DocumentId) -> bool {
        self.partition(city).iter().any(|(doc, _)| doc == id)
    }

    /// All rows of `city`, in table order. Unknown cities give an empty
    /// partition.
    pub fn partition(&self, city: &str) -> Partition<'_> {
        let positions = self.by_city.get(city).map_or(&[][..], Vec::as_slice);
        Partition {
            dim: self.dim,
            rows: &self.rows,
            positions,
        }
    }
}

/// Borrowed view over the rows of one city.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    dim: usize,
    rows: &'a [CorpusRow],
    positions: &'a [usize],
}

impl<'a> Partition<'a> {
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entry `i`, which must be below `len()`.
    #[inline]
    pub(crate) fn entry(&self, i: usize) -> (&'a DocumentId, &'a Vector) {
        let row = &self.rows[self.positions[i]];
        (&row.id, &row.vector)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a DocumentId, &'a Vector)> + '_ {
        let partition = *self;
        (0..partition.len()).map(move |i| partition.entry(i))
    }
}
