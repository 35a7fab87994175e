//! kipipe-fetch: supplier lookup, normalization and category resolution
//!
//! A manufacturer part number goes in; one canonical catalog record comes
//! out, built from Digi-Key and Mouser data, filed under an internal
//! category and given a sequential internal part id.
//!
//! Library interface for the `kipipe` binary and integration tests.

pub mod allocator;
pub mod batch;
pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod mapping;
pub mod merger;
pub mod normalize;
pub mod processor;
pub mod recipes;
pub mod suppliers;
pub mod types;
pub mod value;

pub use crate::db::{CatalogStore, SqliteCatalogStore};
pub use crate::error::{FetchError, FetchResult, RecipeError};
pub use crate::processor::{ComponentProcessor, SupplierSource};
pub use crate::recipes::RecipeBook;
pub use crate::types::NormalizedComponent;
