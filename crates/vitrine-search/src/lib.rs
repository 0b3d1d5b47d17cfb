//! Similarity search for vitrine.
//!
//! Builds a TF-IDF representation of every item's tag text and answers
//! "most similar items to X" queries by cosine similarity. The index is
//! immutable once built; [`Recommender`] swaps whole snapshots atomically
//! when the catalog is reloaded.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod index;
pub mod recommend;
pub mod snapshot;
pub mod text;
pub mod vector;
pub mod vectorizer;

pub use error::{Error, Result};
pub use index::{build_index, IndexStats, ScoredItem, SimilarityIndex};
pub use recommend::{recommend, recommend_by_id, Recommendation};
pub use snapshot::{Recommender, Snapshot};
pub use text::Tokenizer;
pub use vector::SparseVector;
pub use vectorizer::{TfidfVectorizer, Vocabulary};
