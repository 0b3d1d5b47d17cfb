use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An error propagated from the catalog layer.
    #[error(transparent)]
    Core(#[from] vitrine_core::Error),

    /// The query referenced an item the index does not cover.
    #[error("not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    /// The index was built from a different catalog than the one it is joined against.
    #[error(
        "index covers {index_items} items but the catalog has {catalog_items}; rebuild the index"
    )]
    IndexMismatch {
        catalog_items: usize,
        index_items: usize,
    },

    /// The current catalog was not read from a file, so there is nothing to re-read.
    #[error("catalog {catalog_name} was not loaded from a file and cannot be reloaded")]
    NotReloadable { catalog_name: String },
}

impl Error {
    /// Returns `true` when a query named an item that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Core(e) => e.is_not_found(),
            Self::IndexMismatch { .. } | Self::NotReloadable { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
