//! Category taxonomy, supplier mappings and the curation queue

use crate::types::{CategoryRecord, UnmappedCategory};
use kipipe_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Load a taxonomy node
pub async fn load_category(pool: &SqlitePool, category_id: i64) -> Result<Option<CategoryRecord>> {
    let row = sqlx::query(
        r#"
        SELECT category_id, name, prefix, parent_id
        FROM categories
        WHERE category_id = ?
        "#,
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| CategoryRecord {
        category_id: row.get("category_id"),
        name: row.get("name"),
        prefix: row.get("prefix"),
        parent_id: row.get("parent_id"),
    }))
}

/// Insert or update a taxonomy node
pub async fn save_category(pool: &SqlitePool, category: &CategoryRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO categories (category_id, name, prefix, parent_id)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(category_id) DO UPDATE SET
            name = excluded.name,
            prefix = excluded.prefix,
            parent_id = excluded.parent_id
        "#,
    )
    .bind(category.category_id)
    .bind(&category.name)
    .bind(&category.prefix)
    .bind(category.parent_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Exact-match lookup of a supplier category string
///
/// The string is unique across the whole table, so the supplier name is
/// informational only: a string resolves the same way whichever supplier
/// reported it.
pub async fn find_mapping(
    pool: &SqlitePool,
    supplier_name: &str,
    supplier_category: &str,
) -> Result<Option<i64>> {
    let category_id: Option<i64> = sqlx::query_scalar(
        "SELECT category_id FROM category_mappings WHERE supplier_category = ?",
    )
    .bind(supplier_category)
    .fetch_optional(pool)
    .await?;

    if category_id.is_none() {
        tracing::debug!(
            supplier = supplier_name,
            supplier_category = supplier_category,
            "No category mapping"
        );
    }

    Ok(category_id)
}

/// Queue an unmapped supplier category; an existing entry is left untouched
pub async fn queue_unmapped(
    pool: &SqlitePool,
    supplier_name: &str,
    supplier_category: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO unmapped_categories (supplier_name, supplier_category)
        VALUES (?, ?)
        "#,
    )
    .bind(supplier_name)
    .bind(supplier_category)
    .execute(pool)
    .await?;

    Ok(())
}

/// Curation queue in insertion order
pub async fn list_unmapped(pool: &SqlitePool) -> Result<Vec<UnmappedCategory>> {
    let rows = sqlx::query(
        "SELECT id, supplier_name, supplier_category FROM unmapped_categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| UnmappedCategory {
            id: row.get("id"),
            supplier_name: row.get("supplier_name"),
            supplier_category: row.get("supplier_category"),
        })
        .collect())
}

/// Map a supplier category string and drop it from the queue
///
/// Both writes happen in one transaction. An existing mapping for the same
/// string is replaced.
pub async fn assign_mapping(
    pool: &SqlitePool,
    supplier_name: &str,
    supplier_category: &str,
    category_id: i64,
) -> Result<()> {
    if load_category(pool, category_id).await?.is_none() {
        return Err(Error::InvalidInput(format!(
            "{} is not a valid category_id",
            category_id
        )));
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO category_mappings (supplier_name, supplier_category, category_id)
        VALUES (?, ?, ?)
        ON CONFLICT(supplier_category) DO UPDATE SET
            supplier_name = excluded.supplier_name,
            category_id = excluded.category_id
        "#,
    )
    .bind(supplier_name)
    .bind(supplier_category)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM unmapped_categories WHERE supplier_category = ?")
        .bind(supplier_category)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        supplier = supplier_name,
        supplier_category = supplier_category,
        category_id,
        "Category mapping saved"
    );

    Ok(())
}
