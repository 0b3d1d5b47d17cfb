use thiserror::Error;

/// Failures while reading a catalog source.
///
/// All of these are fatal to startup; nothing retries them.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("cannot read catalog source {source_name}: {message}")]
    Unreadable {
        source_name: String,
        message: String,
    },

    /// A required column is absent from the header row.
    #[error("catalog is missing required column `{column}` (found: {})", .available.join(", "))]
    MissingColumn {
        column: &'static str,
        available: Vec<String>,
    },

    /// A data row could not be parsed. `row` is 1-based and excludes the header.
    #[error("malformed row {row}, column `{column}`: {message}")]
    MalformedRow {
        row: u64,
        column: String,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load catalog: {0}")]
    Load(#[from] LoadError),

    #[error("not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },
}

impl Error {
    /// Returns `true` when the error is a failed lookup rather than a load failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
