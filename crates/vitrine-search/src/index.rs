//! The similarity index.
//!
//! Built once from a [`Catalog`], then queried by row: a query only touches
//! the posting lists of the dimensions its own vector uses, never the full
//! item-by-item matrix.

use std::cmp::Ordering;

use serde::Serialize;
use vitrine_core::{Catalog, ItemId};

use crate::error::{Error, Result};
use crate::vector::SparseVector;
use crate::vectorizer::{TfidfVectorizer, Vocabulary};

/// An item id paired with its similarity to the query item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredItem {
    pub id: ItemId,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub items: usize,
    pub vocabulary_size: usize,
    /// Items whose tags produced no tokens; they score 0 against everything.
    pub degenerate_items: usize,
    /// The subset of degenerate items whose tag field is blank.
    pub untagged_items: usize,
    pub nonzero_weights: usize,
}

/// Immutable TF-IDF index over a catalog's tags, addressed by catalog position.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    vocabulary: Vocabulary,
    vectors: Vec<SparseVector>,
    /// Per dimension, the `(position, weight)` of every item using it.
    postings: Vec<Vec<(usize, f64)>>,
    untagged: usize,
}

/// Build the index for `catalog` with the default English tokenizer.
pub fn build_index(catalog: &Catalog) -> SimilarityIndex {
    SimilarityIndex::build(catalog)
}

impl SimilarityIndex {
    pub fn build(catalog: &Catalog) -> Self {
        Self::build_with(catalog, &TfidfVectorizer::default())
    }

    pub fn build_with(catalog: &Catalog, vectorizer: &TfidfVectorizer) -> Self {
        let (vocabulary, vectors) =
            vectorizer.fit_transform(catalog.items().iter().map(|item| item.tags.as_str()));

        let mut postings = vec![Vec::new(); vocabulary.len()];
        for (position, vector) in vectors.iter().enumerate() {
            for &(dim, weight) in vector.entries() {
                postings[dim as usize].push((position, weight));
            }
        }

        let index = Self {
            vocabulary,
            vectors,
            postings,
            untagged: catalog.items().iter().filter(|item| !item.has_tags()).count(),
        };

        let stats = index.stats();
        log::info!(
            "Built similarity index: {} items, {} terms, {} weights",
            stats.items,
            stats.vocabulary_size,
            stats.nonzero_weights
        );
        if stats.degenerate_items > 0 {
            log::warn!(
                "{} items have no usable tags ({} blank, {} only stop words) and will never be \
                 recommended by similarity",
                stats.degenerate_items,
                stats.untagged_items,
                stats.degenerate_items.saturating_sub(stats.untagged_items)
            );
        }

        index
    }

    /// Number of indexed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn vector(&self, id: ItemId) -> Option<&SparseVector> {
        self.vectors.get(id.position())
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            items: self.vectors.len(),
            vocabulary_size: self.vocabulary.len(),
            degenerate_items: self.vectors.iter().filter(|v| v.is_zero()).count(),
            untagged_items: self.untagged,
            nonzero_weights: self.vectors.iter().map(SparseVector::nnz).sum(),
        }
    }

    /// Cosine similarity between two indexed items.
    pub fn similarity(&self, a: ItemId, b: ItemId) -> Result<f64> {
        let va = self.vector_or_not_found(a)?;
        let vb = self.vector_or_not_found(b)?;
        Ok(va.cosine(vb).clamp(0.0, 1.0))
    }

    /// The `top_n` items most similar to `id`, best first.
    ///
    /// The query item itself is never returned. Equal scores keep catalog
    /// order. Items with no shared tokens score 0 and still fill the list
    /// when the catalog has fewer strong matches than `top_n`.
    pub fn top_similar(&self, id: ItemId, top_n: usize) -> Result<Vec<ScoredItem>> {
        let query = self.vector_or_not_found(id)?;
        if top_n == 0 {
            return Ok(Vec::new());
        }

        // Stored vectors are unit length or zero, so the accumulated dot
        // product is the cosine.
        let mut scores = vec![0.0_f64; self.vectors.len()];
        for &(dim, weight) in query.entries() {
            for &(position, other) in &self.postings[dim as usize] {
                scores[position] += weight * other;
            }
        }

        let mut ranked: Vec<ScoredItem> = scores
            .into_iter()
            .enumerate()
            .filter(|&(position, _)| position != id.position())
            .map(|(position, score)| ScoredItem {
                id: ItemId::new(position),
                score: score.clamp(0.0, 1.0),
            })
            .collect();

        if ranked.len() > top_n {
            ranked.select_nth_unstable_by(top_n - 1, rank_order);
            ranked.truncate(top_n);
        }
        ranked.sort_by(rank_order);

        log::debug!(
            "top_similar({}, {}) -> {} results",
            id,
            top_n,
            ranked.len()
        );
        Ok(ranked)
    }

    fn vector_or_not_found(&self, id: ItemId) -> Result<&SparseVector> {
        self.vectors.get(id.position()).ok_or_else(|| Error::NotFound {
            entity: "indexed item with id",
            key: id.to_string(),
        })
    }
}

/// Descending score, then ascending catalog position. A total order, so
/// ranking does not depend on the sort algorithm's stability.
fn rank_order(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}
