//! Catalog persistence
//!
//! The processor talks to storage only through [`CatalogStore`]. The SQLite
//! implementation delegates to the free functions in the submodules, which
//! can also be used directly against a pool.

pub mod categories;
pub mod components;
pub mod sequences;

use crate::types::{CategoryRecord, NormalizedComponent};
use kipipe_common::Result;
use sqlx::SqlitePool;

/// Persisted collaborators of the component pipeline
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Taxonomy node for a category id
    async fn category_details(&self, category_id: i64) -> Result<Option<CategoryRecord>>;

    /// Exact-match lookup of a supplier category string
    async fn category_id_for(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> Result<Option<i64>>;

    /// Add a string to the curation queue; duplicates are ignored
    async fn queue_unmapped_category(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> Result<()>;

    /// Existing id with the greatest numeric suffix under `prefix`
    async fn max_internal_part_id_with_prefix(&self, prefix: &str) -> Result<Option<String>>;

    /// Atomically advance and return the counter for `prefix`
    async fn next_sequence_value(&self, prefix: &str) -> Result<u64>;

    /// Insert or fully replace a component row
    async fn upsert_component(&self, component: &NormalizedComponent) -> Result<()>;
}

/// SQLite-backed [`CatalogStore`]
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn category_details(&self, category_id: i64) -> Result<Option<CategoryRecord>> {
        categories::load_category(&self.pool, category_id).await
    }

    async fn category_id_for(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> Result<Option<i64>> {
        categories::find_mapping(&self.pool, supplier_name, supplier_category).await
    }

    async fn queue_unmapped_category(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> Result<()> {
        categories::queue_unmapped(&self.pool, supplier_name, supplier_category).await
    }

    async fn max_internal_part_id_with_prefix(&self, prefix: &str) -> Result<Option<String>> {
        components::max_internal_part_id(&self.pool, prefix).await
    }

    async fn next_sequence_value(&self, prefix: &str) -> Result<u64> {
        sequences::next_value(&self.pool, prefix).await
    }

    async fn upsert_component(&self, component: &NormalizedComponent) -> Result<()> {
        components::upsert_component(&self.pool, component).await
    }
}
