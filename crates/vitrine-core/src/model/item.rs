use serde::{Deserialize, Serialize};

use crate::model::ids::ItemId;

/// A recommendable product.
///
/// Only `tags` feeds similarity. The remaining attributes are carried
/// through untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Display name. Not guaranteed unique; name lookups take the first match.
    pub name: String,

    /// Free-text bag of brand, category and description terms.
    pub tags: String,

    pub review_count: u64,
    pub brand: String,
    pub image_url: String,
    pub rating: f64,
}

impl Item {
    /// Create an item with empty display attributes.
    ///
    /// The id is a placeholder until the item is placed into a
    /// [`Catalog`](crate::Catalog), which numbers items by position.
    #[must_use]
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            id: ItemId::default(),
            name: name.into(),
            tags: tags.into(),
            review_count: 0,
            brand: String::new(),
            image_url: String::new(),
            rating: 0.0,
        }
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    #[must_use]
    pub fn with_review_count(mut self, count: u64) -> Self {
        self.review_count = count;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Whether the tag field carries any non-whitespace text at all.
    #[must_use]
    pub fn has_tags(&self) -> bool {
        !self.tags.trim().is_empty()
    }
}
