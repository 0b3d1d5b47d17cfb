//! Core domain model for vitrine.
//!
//! This crate defines the catalog of recommendable items, the loader that
//! reads it from a tabular CSV source, and the name and id lookups used to
//! resolve queries against it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::{Catalog, REQUIRED_COLUMNS};
pub use error::{Error, LoadError, Result};
pub use model::{Item, ItemId};
