//! Error types for kipipe-fetch
//!
//! Request-level failures are values, not panics: the processor turns every
//! variant into "no record" after logging it, and batch runs move on to the
//! next part number.

use thiserror::Error;

/// Why a part number produced no record
#[derive(Debug, Error)]
pub enum FetchError {
    /// No supplier returned data (miss or unreachable, indistinguishable)
    #[error("Part not found on any supplier: {0}")]
    NotFound(String),

    /// No supplier category string maps to an internal category
    #[error("No category mapping for {part_number} (supplier categories: {labels:?})")]
    CategoryUnresolved {
        part_number: String,
        labels: Vec<String>,
    },

    /// A mapping points at a category that does not exist
    #[error("Category {0} is mapped but has no taxonomy record")]
    CategoryDetailsMissing(i64),

    /// Persistence layer failure
    #[error("Store error: {0}")]
    Store(#[from] kipipe_common::Error),
}

impl From<sqlx::Error> for FetchError {
    fn from(err: sqlx::Error) -> Self {
        FetchError::Store(kipipe_common::Error::Database(err))
    }
}

/// Value generation failure inside a recipe (recovered locally)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// None of the parameters the value is built from is present
    #[error("No key parameters present (expected any of: {0})")]
    NoKeyParameters(String),
}

/// Result type for processor operations
pub type FetchResult<T> = Result<T, FetchError>;
