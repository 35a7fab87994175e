//! Per-prefix part id counters
//!
//! Allocation is one `INSERT .. ON CONFLICT DO UPDATE .. RETURNING`
//! statement, so SQLite's writer lock makes read-and-increment atomic: two
//! concurrent callers for the same prefix always receive different values.
//!
//! The counter is seeded from (and never falls behind) the greatest numeric
//! suffix already present in `components` for the prefix.

use kipipe_common::{Error, Result};
use sqlx::SqlitePool;

/// Advance the counter for `prefix` and return the new value (first call: 1
/// above the greatest existing suffix, or 1)
pub async fn next_value(pool: &SqlitePool, prefix: &str) -> Result<u64> {
    let head = format!("{}-", prefix);
    let head_len = head.chars().count() as i64;

    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO part_id_sequences (prefix, last_value)
        VALUES (
            ?1,
            COALESCE((
                SELECT MAX(CAST(substr(internal_part_id, ?2 + 1) AS INTEGER))
                FROM components
                WHERE substr(internal_part_id, 1, ?2) = ?3
                  AND length(internal_part_id) > ?2
                  AND substr(internal_part_id, ?2 + 1) NOT GLOB '*[^0-9]*'
            ), 0) + 1
        )
        ON CONFLICT(prefix) DO UPDATE SET
            last_value = MAX(last_value, excluded.last_value - 1) + 1
        RETURNING last_value
        "#,
    )
    .bind(prefix)
    .bind(head_len)
    .bind(&head)
    .fetch_one(pool)
    .await?;

    u64::try_from(value)
        .map_err(|_| Error::Internal(format!("Negative sequence value for prefix {}", prefix)))
}

/// Current counter value without advancing it
pub async fn current_value(pool: &SqlitePool, prefix: &str) -> Result<Option<u64>> {
    let value: Option<i64> =
        sqlx::query_scalar("SELECT last_value FROM part_id_sequences WHERE prefix = ?")
            .bind(prefix)
            .fetch_optional(pool)
            .await?;

    Ok(value.and_then(|v| u64::try_from(v).ok()))
}
