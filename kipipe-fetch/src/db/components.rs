//! Component record persistence

use crate::types::{NormalizedComponent, SecondaryListing};
use kipipe_common::Result;
use sqlx::{Row, SqlitePool};

/// Insert a component, or overwrite every non-key column of an existing row
///
/// Columns absent from the record (e.g. `supplier_2` when only one supplier
/// had data) are written as NULL so a refresh never keeps stale values.
pub async fn upsert_component(pool: &SqlitePool, c: &NormalizedComponent) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO components (
            manufacturer_part_number, manufacturer, description, component_value,
            datasheet_url, product_status, rohs_status, package_case, mounting_type,
            operating_temperature, category_id, internal_part_id, parameters,
            supplier_1, supplier_part_number_1, supplier_product_url_1,
            supplier_2, supplier_part_number_2, supplier_product_url_2,
            last_updated
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(manufacturer_part_number) DO UPDATE SET
            manufacturer = excluded.manufacturer,
            description = excluded.description,
            component_value = excluded.component_value,
            datasheet_url = excluded.datasheet_url,
            product_status = excluded.product_status,
            rohs_status = excluded.rohs_status,
            package_case = excluded.package_case,
            mounting_type = excluded.mounting_type,
            operating_temperature = excluded.operating_temperature,
            category_id = excluded.category_id,
            internal_part_id = excluded.internal_part_id,
            parameters = excluded.parameters,
            supplier_1 = excluded.supplier_1,
            supplier_part_number_1 = excluded.supplier_part_number_1,
            supplier_product_url_1 = excluded.supplier_product_url_1,
            supplier_2 = excluded.supplier_2,
            supplier_part_number_2 = excluded.supplier_part_number_2,
            supplier_product_url_2 = excluded.supplier_product_url_2,
            last_updated = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&c.manufacturer_part_number)
    .bind(&c.manufacturer)
    .bind(&c.description)
    .bind(&c.component_value)
    .bind(&c.datasheet_url)
    .bind(&c.product_status)
    .bind(&c.rohs_status)
    .bind(&c.package_case)
    .bind(&c.mounting_type)
    .bind(&c.operating_temperature)
    .bind(c.category_id)
    .bind(&c.internal_part_id)
    .bind(&c.parameters)
    .bind(&c.supplier_1)
    .bind(&c.supplier_part_number_1)
    .bind(&c.supplier_product_url_1)
    .bind(c.secondary.as_ref().map(|s| s.supplier_2.as_str()))
    .bind(c.secondary.as_ref().and_then(|s| s.supplier_part_number_2.as_deref()))
    .bind(c.secondary.as_ref().and_then(|s| s.supplier_product_url_2.as_deref()))
    .execute(pool)
    .await?;

    tracing::info!(
        manufacturer_part_number = %c.manufacturer_part_number,
        internal_part_id = %c.internal_part_id,
        "Component upserted"
    );

    Ok(())
}

/// Load a component by manufacturer part number
pub async fn load_component(
    pool: &SqlitePool,
    manufacturer_part_number: &str,
) -> Result<Option<NormalizedComponent>> {
    let row = sqlx::query(
        r#"
        SELECT manufacturer_part_number, manufacturer, description, component_value,
               datasheet_url, product_status, rohs_status, package_case, mounting_type,
               operating_temperature, category_id, internal_part_id, parameters,
               supplier_1, supplier_part_number_1, supplier_product_url_1,
               supplier_2, supplier_part_number_2, supplier_product_url_2
        FROM components
        WHERE manufacturer_part_number = ?
        "#,
    )
    .bind(manufacturer_part_number)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| {
        let supplier_2: Option<String> = row.get("supplier_2");
        let secondary = supplier_2.map(|supplier_2| SecondaryListing {
            supplier_2,
            supplier_part_number_2: row.get("supplier_part_number_2"),
            supplier_product_url_2: row.get("supplier_product_url_2"),
        });

        NormalizedComponent {
            manufacturer_part_number: row.get("manufacturer_part_number"),
            manufacturer: row.get("manufacturer"),
            description: row.get("description"),
            component_value: row.get("component_value"),
            datasheet_url: row.get("datasheet_url"),
            product_status: row.get("product_status"),
            rohs_status: row.get("rohs_status"),
            package_case: row.get("package_case"),
            mounting_type: row.get("mounting_type"),
            operating_temperature: row.get("operating_temperature"),
            category_id: row.get("category_id"),
            internal_part_id: row.get("internal_part_id"),
            parameters: row.get("parameters"),
            supplier_1: row.get("supplier_1"),
            supplier_part_number_1: row.get("supplier_part_number_1"),
            supplier_product_url_1: row.get("supplier_product_url_1"),
            secondary,
        }
    }))
}

/// Existing internal part id with the greatest numeric suffix for `prefix`
///
/// Only ids of the exact form `<prefix>-<digits>` count, so a parent prefix
/// (`IC`) never picks up ids of a child prefix (`IC-TMR-0001`). Ordering by
/// length first keeps `X-10000` above `X-9999`.
pub async fn max_internal_part_id(pool: &SqlitePool, prefix: &str) -> Result<Option<String>> {
    let head = format!("{}-", prefix);
    let head_len = head.chars().count() as i64;

    let id: Option<String> = sqlx::query_scalar(
        r#"
        SELECT internal_part_id
        FROM components
        WHERE substr(internal_part_id, 1, ?1) = ?2
          AND length(internal_part_id) > ?1
          AND substr(internal_part_id, ?1 + 1) NOT GLOB '*[^0-9]*'
        ORDER BY length(internal_part_id) DESC, internal_part_id DESC
        LIMIT 1
        "#,
    )
    .bind(head_len)
    .bind(&head)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}
