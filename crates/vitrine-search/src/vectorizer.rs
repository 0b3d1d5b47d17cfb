//! TF-IDF weighting of tag text.
//!
//! For token `t` in document `d` of a corpus of `N` documents:
//!
//! ```text
//! tf(t, d)  = number of occurrences of t in d
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1
//! weight    = tf(t, d) * idf(t)
//! ```
//!
//! `df(t)` is the number of documents containing `t`. The `1 +` terms smooth
//! the ratio as if one extra document contained every token, so no token
//! divides by zero and a token present everywhere still weighs 1. Each
//! document vector is then scaled to unit Euclidean length.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::text::Tokenizer;
use crate::vector::SparseVector;

/// Smoothing constant added to both `N` and `df(t)` in the idf formula.
pub const IDF_SMOOTHING: f64 = 1.0;

/// Token to dimension mapping, with the idf learned for each dimension.
///
/// Dimensions are assigned in lexicographic token order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    dimensions: BTreeMap<String, u32>,
    idf: Vec<f64>,
}

impl Vocabulary {
    #[must_use]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    #[must_use]
    pub fn dimension(&self, token: &str) -> Option<u32> {
        self.dimensions.get(token).copied()
    }

    #[must_use]
    pub fn idf(&self, token: &str) -> Option<f64> {
        self.dimension(token).map(|dim| self.idf[dim as usize])
    }

    /// Tokens in dimension order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    #[must_use]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Learn the vocabulary from `documents` and return one unit vector per
    /// document, in input order.
    ///
    /// A document with no surviving tokens maps to the zero vector.
    pub fn fit_transform<'a>(
        &self,
        documents: impl IntoIterator<Item = &'a str>,
    ) -> (Vocabulary, Vec<SparseVector>) {
        let term_counts: Vec<HashMap<String, u32>> = documents
            .into_iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in self.tokenizer.tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let tokens: BTreeSet<&str> = term_counts
            .iter()
            .flat_map(|counts| counts.keys().map(String::as_str))
            .collect();
        let dimensions: BTreeMap<String, u32> = tokens
            .into_iter()
            .enumerate()
            .map(|(dim, token)| (token.to_string(), dim as u32))
            .collect();

        let mut document_frequency = vec![0_usize; dimensions.len()];
        for counts in &term_counts {
            for token in counts.keys() {
                if let Some(&dim) = dimensions.get(token) {
                    document_frequency[dim as usize] += 1;
                }
            }
        }

        let n = term_counts.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((IDF_SMOOTHING + n) / (IDF_SMOOTHING + df as f64)).ln() + 1.0)
            .collect();

        let vectors = term_counts
            .iter()
            .map(|counts| {
                SparseVector::from_pairs(counts.iter().filter_map(|(token, &tf)| {
                    dimensions
                        .get(token)
                        .map(|&dim| (dim, f64::from(tf) * idf[dim as usize]))
                }))
                .normalized()
            })
            .collect();

        (Vocabulary { dimensions, idf }, vectors)
    }
}
