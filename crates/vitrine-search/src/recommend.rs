//! Display-ready recommendations: index query joined with catalog attributes.

use serde::Serialize;
use vitrine_core::{Catalog, ItemId};

use crate::error::{Error, Result};
use crate::index::SimilarityIndex;

/// A recommended item with everything a caller needs to show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: ItemId,
    pub name: String,
    pub review_count: u64,
    pub brand: String,
    pub image_url: String,
    pub rating: f64,
    pub score: f64,
}

/// Recommend the `top_n` items most similar to the item named `item_name`.
///
/// The name resolves to its first occurrence in catalog order.
///
/// # Errors
///
/// Returns a not-found error when no item has that name, and
/// [`Error::IndexMismatch`] when `index` was not built from `catalog`.
pub fn recommend(
    catalog: &Catalog,
    index: &SimilarityIndex,
    item_name: &str,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    ensure_matching(catalog, index)?;
    let item = catalog.find_by_name(item_name)?;
    recommend_by_id(catalog, index, item.id, top_n)
}

/// Recommend by stable item id instead of display name.
pub fn recommend_by_id(
    catalog: &Catalog,
    index: &SimilarityIndex,
    id: ItemId,
    top_n: usize,
) -> Result<Vec<Recommendation>> {
    ensure_matching(catalog, index)?;

    index
        .top_similar(id, top_n)?
        .into_iter()
        .map(|scored| -> Result<Recommendation> {
            let item = catalog.find_by_id(scored.id)?;
            Ok(Recommendation {
                id: item.id,
                name: item.name.clone(),
                review_count: item.review_count,
                brand: item.brand.clone(),
                image_url: item.image_url.clone(),
                rating: item.rating,
                score: scored.score,
            })
        })
        .collect()
}

fn ensure_matching(catalog: &Catalog, index: &SimilarityIndex) -> Result<()> {
    if catalog.len() == index.len() {
        Ok(())
    } else {
        Err(Error::IndexMismatch {
            catalog_items: catalog.len(),
            index_items: index.len(),
        })
    }
}
