//! TF-IDF term weighting over a trained vocabulary.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use topicrec_core::{Error, Result, TermWeights};

/// Maps a document to sparse term weights over a fixed vocabulary.
pub trait TermWeighter: Send + Sync + std::fmt::Debug {
    /// Number of vocabulary terms, i.e. the dimensionality of every output.
    fn vocab_size(&self) -> usize;

    /// Weigh `text`. Terms outside the vocabulary are dropped.
    fn weigh(&self, text: &str) -> TermWeights;
}

/// How raw counts become weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfOptions {
    pub lowercase: bool,
    /// Replace a raw count `tf` with `1 + ln(tf)`
    pub sublinear_tf: bool,
    pub l2_normalize: bool,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            sublinear_tf: false,
            l2_normalize: true,
            stop_words: Vec::new(),
        }
    }
}

/// Serialized TF-IDF artifact: term `i` has weight `idf[i]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfParts {
    pub terms: Vec<String>,
    pub idf: Vec<f32>,
    #[serde(default)]
    pub options: TfidfOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfParts", into = "TfidfParts")]
pub struct TfidfWeighter {
    terms: Vec<String>,
    index: AHashMap<String, u32>,
    idf: Vec<f32>,
    stop_words: AHashSet<String>,
    options: TfidfOptions,
}

impl TfidfWeighter {
    pub fn new(terms: Vec<String>, idf: Vec<f32>, options: TfidfOptions) -> Result<Self> {
        if terms.len() != idf.len() {
            return Err(Error::ArtifactLoad(format!(
                "tf-idf vocabulary has {} terms but {} idf weights",
                terms.len(),
                idf.len()
            )));
        }
        if terms.len() > u32::MAX as usize {
            return Err(Error::ArtifactLoad("tf-idf vocabulary too large".to_string()));
        }
        if let Some(bad) = idf.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::ArtifactLoad(format!("invalid idf weight {}", bad)));
        }

        let mut index = AHashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i as u32).is_some() {
                return Err(Error::ArtifactLoad(format!(
                    "duplicate vocabulary term '{}'",
                    term
                )));
            }
        }

        let stop_words = options
            .stop_words
            .iter()
            .map(|w| if options.lowercase { w.to_lowercase() } else { w.clone() })
            .collect();

        Ok(Self {
            terms,
            index,
            idf,
            stop_words,
            options,
        })
    }

    /// Split into tokens of two or more word characters.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<std::borrow::Cow<'a, str>> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| t.chars().nth(1).is_some())
            .map(|t| {
                if self.options.lowercase {
                    std::borrow::Cow::Owned(t.to_lowercase())
                } else {
                    std::borrow::Cow::Borrowed(t)
                }
            })
            .filter(|t| !self.stop_words.contains(t.as_ref()))
            .collect()
    }
}

impl TermWeighter for TfidfWeighter {
    fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    fn weigh(&self, text: &str) -> TermWeights {
        let hits: Vec<(u32, f32)> = self
            .tokenize(text)
            .iter()
            .filter_map(|t| self.index.get(t.as_ref()).map(|&i| (i, 1.0)))
            .collect();

        // every index comes from the vocabulary, so from_pairs cannot fail
        let mut weights = TermWeights::from_pairs(self.terms.len(), hits)
            .unwrap_or_else(|_| TermWeights::empty(self.terms.len()));

        let sublinear = self.options.sublinear_tf;
        weights.map_values(|i, count| {
            let tf = if sublinear { 1.0 + count.ln() } else { count };
            tf * self.idf[i]
        });
        if self.options.l2_normalize {
            weights.l2_normalize();
        }
        weights
    }
}

impl TryFrom<TfidfParts> for TfidfWeighter {
    type Error = Error;

    fn try_from(parts: TfidfParts) -> Result<Self> {
        Self::new(parts.terms, parts.idf, parts.options)
    }
}

impl From<TfidfWeighter> for TfidfParts {
    fn from(w: TfidfWeighter) -> Self {
        TfidfParts {
            terms: w.terms,
            idf: w.idf,
            options: w.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighter(options: TfidfOptions) -> TfidfWeighter {
        let terms = ["pizza", "sushi", "taco", "spicy", "ramen"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        TfidfWeighter::new(terms, vec![1.0, 2.0, 1.5, 1.2, 2.5], options).unwrap()
    }

    #[test]
    fn test_weigh_known_terms() {
        let w = weighter(TfidfOptions {
            l2_normalize: false,
            ..Default::default()
        });
        let weights = w.weigh("Spicy taco and taco, spicy!");
        assert_eq!(weights.indices(), &[2, 3]);
        assert!((weights.values()[0] - 3.0).abs() < 1e-6);
        assert!((weights.values()[1] - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_weigh_normalizes() {
        let w = weighter(TfidfOptions::default());
        let weights = w.weigh("pizza sushi");
        let norm: f32 = weights.values().iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let w = weighter(TfidfOptions::default());
        let weights = w.weigh("zzzzqqqxyz");
        assert!(weights.is_zero());
        assert_eq!(weights.dim(), 5);
    }

    #[test]
    fn test_sublinear_and_stop_words() {
        let w = weighter(TfidfOptions {
            sublinear_tf: true,
            l2_normalize: false,
            stop_words: vec!["Pizza".to_string()],
            ..Default::default()
        });
        let weights = w.weigh("pizza ramen ramen ramen");
        assert_eq!(weights.indices(), &[4]);
        let expected = (1.0 + 3.0f32.ln()) * 2.5;
        assert!((weights.values()[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_single_char_tokens_dropped() {
        let w = weighter(TfidfOptions::default());
        assert_eq!(w.tokenize("a b sushi_bar x"), vec!["sushi_bar"]);
    }

    #[test]
    fn test_invalid_parts_rejected() {
        let err = TfidfWeighter::new(vec!["a".into(), "a".into()], vec![1.0, 1.0], TfidfOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactLoad(_)));

        let err = TfidfWeighter::new(vec!["a".into()], vec![], TfidfOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ArtifactLoad(_)));
    }
}
