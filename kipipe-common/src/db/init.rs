//! Database initialization
//!
//! Creates the catalog database on first run and brings the schema up to
//! date on every start. All table creation is idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (or create) the catalog database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets readers proceed while the single writer holds the lock
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every catalog table and index (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    create_categories_table(pool).await?;
    create_category_mappings_table(pool).await?;
    create_unmapped_categories_table(pool).await?;
    create_components_table(pool).await?;
    create_part_id_sequences_table(pool).await?;

    Ok(())
}

/// Internal category taxonomy (curated by hand)
pub async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            prefix TEXT NOT NULL,
            parent_id INTEGER REFERENCES categories(category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Supplier category string -> internal category
///
/// The supplier category string is unique across all suppliers.
pub async fn create_category_mappings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS category_mappings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            supplier_name TEXT NOT NULL,
            supplier_category TEXT NOT NULL UNIQUE,
            category_id INTEGER NOT NULL REFERENCES categories(category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Curation queue of supplier category strings with no mapping yet
pub async fn create_unmapped_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS unmapped_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            supplier_name TEXT NOT NULL,
            supplier_category TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Normalized component records, keyed by manufacturer part number
pub async fn create_components_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS components (
            manufacturer_part_number TEXT PRIMARY KEY,
            manufacturer TEXT,
            description TEXT NOT NULL,
            component_value TEXT NOT NULL,
            datasheet_url TEXT,
            product_status TEXT,
            rohs_status TEXT NOT NULL,
            package_case TEXT,
            mounting_type TEXT,
            operating_temperature TEXT,
            category_id INTEGER NOT NULL REFERENCES categories(category_id),
            internal_part_id TEXT NOT NULL UNIQUE,
            parameters TEXT NOT NULL,
            supplier_1 TEXT NOT NULL,
            supplier_part_number_1 TEXT,
            supplier_product_url_1 TEXT,
            supplier_2 TEXT,
            supplier_part_number_2 TEXT,
            supplier_product_url_2 TEXT,
            last_updated TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Per-prefix counters backing internal part id allocation
pub async fn create_part_id_sequences_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS part_id_sequences (
            prefix TEXT PRIMARY KEY,
            last_value INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
