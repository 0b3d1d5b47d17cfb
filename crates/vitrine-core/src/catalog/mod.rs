//! The catalog of recommendable items.
//!
//! A [`Catalog`] is loaded once from a CSV source and never mutated. Reloading
//! means building a new catalog and replacing the old one wholesale.

mod loader;

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, LoadError, Result};
use crate::model::{Item, ItemId};

pub use loader::REQUIRED_COLUMNS;

/// An ordered, read-only sequence of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    items: Vec<Item>,
    source: String,
    path: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog from items already in memory.
    ///
    /// Items are renumbered so that each id equals its position.
    #[must_use]
    pub fn from_items(source: impl Into<String>, items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(position, mut item)| {
                item.id = ItemId::new(position);
                item
            })
            .collect();

        Self {
            items,
            source: source.into(),
            path: None,
            loaded_at: Utc::now(),
        }
    }

    /// Load a catalog from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unreadable`] if the file cannot be opened, and the
    /// other [`LoadError`] variants for structural problems in its content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| LoadError::Unreadable {
            source_name: source.clone(),
            message: e.to_string(),
        })?;
        let mut catalog = Self::from_reader(file, source)?;
        catalog.path = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a catalog from any CSV stream.
    ///
    /// `source` labels the stream in errors and status output.
    pub fn from_reader(reader: impl Read, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let items = loader::read_items(reader, &source)?;

        log::info!("Loaded {} items from {}", items.len(), source);

        Ok(Self::from_items(source, items))
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at the given catalog position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Where the catalog was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The file this catalog was read from, if it came from one.
    ///
    /// Catalogs built with [`from_reader`](Self::from_reader) or
    /// [`from_items`](Self::from_items) have no path and cannot be re-read.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// First item whose name equals `name` exactly, in catalog order.
    ///
    /// Duplicate names resolve to their first occurrence. Use
    /// [`find_by_id`](Self::find_by_id) when the caller holds a stable id.
    pub fn find_by_name(&self, name: &str) -> Result<&Item> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| Error::NotFound {
                entity: "item named",
                key: format!("{name:?}"),
            })
    }

    pub fn find_by_id(&self, id: ItemId) -> Result<&Item> {
        self.items
            .get(id.position())
            .ok_or_else(|| Error::NotFound {
                entity: "item with id",
                key: id.to_string(),
            })
    }

    /// Unique, non-empty names in first-seen order.
    #[must_use]
    pub fn all_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .collect()
    }

    /// Names shared by more than one item, in first-seen order.
    ///
    /// Name lookups for these are ambiguous and only reach the first item.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in &self.items {
            *counts.entry(item.name.as_str()).or_insert(0) += 1;
        }

        let mut reported = HashSet::new();
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .filter(|name| {
                !name.is_empty()
                    && counts.get(name).copied().unwrap_or(0) > 1
                    && reported.insert(*name)
            })
            .collect()
    }
}
