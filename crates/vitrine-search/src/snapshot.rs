//! Catalog + index pairs and their atomic replacement on reload.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use vitrine_core::{Catalog, ItemId};

use crate::error::{Error, Result};
use crate::index::SimilarityIndex;
use crate::recommend::{recommend, recommend_by_id, Recommendation};

/// A catalog together with the index built from it.
///
/// Keeping both in one value means a reader can never join one catalog's
/// attributes against another catalog's index.
#[derive(Debug, Clone)]
pub struct Snapshot {
    catalog: Catalog,
    index: SimilarityIndex,
}

impl Snapshot {
    pub fn build(catalog: Catalog) -> Self {
        let index = SimilarityIndex::build(&catalog);
        Self { catalog, index }
    }

    /// Load a CSV catalog and index it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::build(Catalog::load(path)?))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn recommend(&self, item_name: &str, top_n: usize) -> Result<Vec<Recommendation>> {
        recommend(&self.catalog, &self.index, item_name, top_n)
    }

    pub fn recommend_by_id(&self, id: ItemId, top_n: usize) -> Result<Vec<Recommendation>> {
        recommend_by_id(&self.catalog, &self.index, id, top_n)
    }
}

/// Serves queries from the current snapshot and replaces it on reload.
///
/// Readers take an `Arc<Snapshot>` and keep using it for as long as they
/// hold it; a reload builds a fresh snapshot off to the side and swaps it
/// in with a single atomic store. A failed reload leaves the current
/// snapshot untouched.
pub struct Recommender {
    current: ArcSwap<Snapshot>,
}

impl Recommender {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Snapshot::load(path)?))
    }

    /// The snapshot in effect right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Reload from the file the current catalog was loaded from.
    ///
    /// Fails with [`Error::NotReloadable`] when the current catalog was
    /// built in memory; use [`reload_from`](Self::reload_from) or
    /// [`replace`](Self::replace) for those.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let current = self.snapshot();
        let Some(path) = current.catalog().path() else {
            return Err(Error::NotReloadable {
                catalog_name: current.catalog().source().to_string(),
            });
        };
        self.reload_from(path)
    }

    /// Load and index a catalog from `path`, then make it current.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> Result<Arc<Snapshot>> {
        let path = path.as_ref();
        log::info!("Reloading catalog from {}", path.display());

        let snapshot = Snapshot::load(path).map_err(|e| {
            log::warn!("Reload failed, keeping current catalog: {e}");
            e
        })?;
        Ok(self.replace(snapshot))
    }

    /// Swap in an already built snapshot.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        log::info!(
            "Serving {} items from {}",
            snapshot.catalog().len(),
            snapshot.catalog().source()
        );
        snapshot
    }

    pub fn recommend(&self, item_name: &str, top_n: usize) -> Result<Vec<Recommendation>> {
        self.snapshot().recommend(item_name, top_n)
    }

    pub fn recommend_by_id(&self, id: ItemId, top_n: usize) -> Result<Vec<Recommendation>> {
        self.snapshot().recommend_by_id(id, top_n)
    }
}

impl fmt::Debug for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("Recommender")
            .field("source", &snapshot.catalog().source())
            .field("items", &snapshot.catalog().len())
            .finish()
    }
}
