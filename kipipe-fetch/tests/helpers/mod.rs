//! Test Helper Utilities
//!
//! Seeded catalog databases, canned supplier adapters and a store wrapper
//! that records curation-queue calls.

#![allow(dead_code)]

use kipipe_fetch::db::categories::{assign_mapping, save_category};
use kipipe_fetch::db::CatalogStore;
use kipipe_fetch::mapping::SupplierProfile;
use kipipe_fetch::suppliers::SupplierAdapter;
use kipipe_fetch::types::{CategoryRecord, NormalizedComponent};
use kipipe_fetch::{ComponentProcessor, RecipeBook, SqliteCatalogStore, SupplierSource};
use kipipe_common::config::BaseSelection;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const IC_CATEGORY: i64 = 1;
pub const TIMER_CATEGORY: i64 = 2;
pub const RESISTOR_CATEGORY: i64 = 3;
pub const CAPACITOR_CATEGORY: i64 = 4;
/// Mapped, but with no taxonomy record behind it
pub const DANGLING_CATEGORY: i64 = 999;

// ============================================================================
// Database
// ============================================================================

/// In-memory catalog with a small taxonomy and mappings
///
/// | id | name                | prefix | parent |
/// |----|---------------------|--------|--------|
/// | 1  | Integrated Circuits | IC     | -      |
/// | 2  | Timers              | TMR    | 1      |
/// | 3  | Resistors           | RES    | -      |
/// | 4  | Capacitors          | CAP    | -      |
pub async fn seeded_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    kipipe_common::db::create_schema(&pool).await.unwrap();
    seed_taxonomy(&pool).await;
    pool
}

pub async fn seed_taxonomy(pool: &SqlitePool) {
    let taxonomy = [
        (IC_CATEGORY, "Integrated Circuits", "IC", None),
        (TIMER_CATEGORY, "Timers", "TMR", Some(IC_CATEGORY)),
        (RESISTOR_CATEGORY, "Resistors", "RES", None),
        (CAPACITOR_CATEGORY, "Capacitors", "CAP", None),
    ];
    for (category_id, name, prefix, parent_id) in taxonomy {
        save_category(
            pool,
            &CategoryRecord {
                category_id,
                name: name.to_string(),
                prefix: prefix.to_string(),
                parent_id,
            },
        )
        .await
        .unwrap();
    }

    assign_mapping(pool, "Digi-Key", "Timers", TIMER_CATEGORY).await.unwrap();
    assign_mapping(pool, "Digi-Key", "Chip Resistor - Surface Mount", RESISTOR_CATEGORY)
        .await
        .unwrap();
    assign_mapping(pool, "Digi-Key", "Ceramic Capacitors", CAPACITOR_CATEGORY)
        .await
        .unwrap();
}

/// Map a supplier string to a category id that does not exist
pub async fn map_dangling(pool: &SqlitePool, supplier_category: &str) {
    sqlx::query("PRAGMA foreign_keys = OFF").execute(pool).await.unwrap();
    sqlx::query(
        "INSERT INTO category_mappings (supplier_name, supplier_category, category_id) VALUES ('Digi-Key', ?, ?)",
    )
    .bind(supplier_category)
    .bind(DANGLING_CATEGORY)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await.unwrap();
}

// ============================================================================
// Suppliers
// ============================================================================

/// Adapter answering from a fixed part-number table
pub struct StubSupplier {
    name: String,
    responses: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl StubSupplier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, part_number: &str, response: Value) -> Self {
        self.responses.insert(part_number.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SupplierAdapter for StubSupplier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, part_number: &str) -> Option<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.get(part_number).cloned()
    }
}

pub fn digikey_source(stub: StubSupplier) -> SupplierSource {
    SupplierSource::new(Arc::new(stub), SupplierProfile::digikey())
}

pub fn mouser_source(stub: StubSupplier) -> SupplierSource {
    SupplierSource::new(Arc::new(stub), SupplierProfile::mouser())
}

// ============================================================================
// Store wrapper
// ============================================================================

/// SQLite store that records every curation-queue call
pub struct RecordingStore {
    inner: SqliteCatalogStore,
    queued: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteCatalogStore::new(pool),
            queued: Mutex::new(Vec::new()),
        }
    }

    pub fn queued(&self) -> Vec<(String, String)> {
        self.queued.lock().unwrap().clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        self.inner.pool()
    }
}

#[async_trait::async_trait]
impl CatalogStore for RecordingStore {
    async fn category_details(&self, category_id: i64) -> kipipe_common::Result<Option<CategoryRecord>> {
        self.inner.category_details(category_id).await
    }

    async fn category_id_for(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> kipipe_common::Result<Option<i64>> {
        self.inner.category_id_for(supplier_name, supplier_category).await
    }

    async fn queue_unmapped_category(
        &self,
        supplier_name: &str,
        supplier_category: &str,
    ) -> kipipe_common::Result<()> {
        self.queued
            .lock()
            .unwrap()
            .push((supplier_name.to_string(), supplier_category.to_string()));
        self.inner
            .queue_unmapped_category(supplier_name, supplier_category)
            .await
    }

    async fn max_internal_part_id_with_prefix(&self, prefix: &str) -> kipipe_common::Result<Option<String>> {
        self.inner.max_internal_part_id_with_prefix(prefix).await
    }

    async fn next_sequence_value(&self, prefix: &str) -> kipipe_common::Result<u64> {
        self.inner.next_sequence_value(prefix).await
    }

    async fn upsert_component(&self, component: &NormalizedComponent) -> kipipe_common::Result<()> {
        self.inner.upsert_component(component).await
    }
}

pub fn processor(
    store: Arc<dyn CatalogStore>,
    suppliers: Vec<SupplierSource>,
    base_selection: BaseSelection,
) -> ComponentProcessor {
    ComponentProcessor::new(store, suppliers, RecipeBook::standard(), base_selection)
}

// ============================================================================
// Fixtures
// ============================================================================

pub const NE555DR_DESCRIPTION: &str = "IC OSC SINGLE TIMER 100KHZ 8-SOIC";

fn digikey_category(path: &[&str]) -> Value {
    path.iter().rev().fold(Value::Null, |child, name| {
        if child.is_null() {
            json!({ "Name": name, "ChildCategories": [] })
        } else {
            json!({ "Name": name, "ChildCategories": [child] })
        }
    })
}

/// Digi-Key v4 product for an arbitrary part in the given category path
pub fn digikey_product(part_number: &str, category: &[&str], parameters: Value, description: &str) -> Value {
    json!({
        "ManufacturerProductNumber": part_number,
        "Manufacturer": { "Id": 296, "Name": "Texas Instruments" },
        "Description": {
            "ProductDescription": "IC OSC SINGLE TIMER",
            "DetailedDescription": description
        },
        "DatasheetUrl": format!("https://www.ti.com/lit/ds/symlink/{}.pdf", part_number.to_lowercase()),
        "ProductUrl": format!("https://www.digikey.com/en/products/detail/{}", part_number),
        "ProductStatus": { "Id": 0, "Status": "Active" },
        "Classifications": { "RohsStatus": "ROHS3 Compliant", "MoistureSensitivityLevel": "1  (Unlimited)" },
        "QuantityAvailable": 25000,
        "Category": digikey_category(category),
        "Parameters": parameters,
        "ProductVariations": [
            {
                "DigiKeyProductNumber": format!("296-{}-1-ND", part_number),
                "StandardPricing": [
                    { "BreakQuantity": 1, "UnitPrice": 0.42, "TotalPrice": 0.42 },
                    { "BreakQuantity": 10, "UnitPrice": 0.368, "TotalPrice": 3.68 }
                ]
            }
        ]
    })
}

/// Digi-Key NE555DR in Integrated Circuits (ICs) > Embedded > Timers
pub fn digikey_ne555dr() -> Value {
    digikey_product(
        "NE555DR",
        &["Integrated Circuits (ICs)", "Embedded", "Timers"],
        json!([
            { "ParameterId": 69, "ParameterText": "Mounting Type", "ValueText": "Surface Mount" },
            { "ParameterId": 16, "ParameterText": "Package / Case", "ValueText": "8-SOIC (0.154\", 3.90mm Width)" },
            { "ParameterId": 252, "ParameterText": "Operating Temperature", "ValueText": "0°C ~ 70°C (TA)" },
            { "ParameterId": 2085, "ParameterText": "Frequency", "ValueText": "100kHz" }
        ]),
        NE555DR_DESCRIPTION,
    )
}

/// Mouser search result with a flat category string
pub fn mouser_part(part_number: &str, category: &str, description: &str) -> Value {
    json!({
        "ManufacturerPartNumber": part_number,
        "Manufacturer": "Texas Instruments",
        "Description": description,
        "DataSheetUrl": "https://www.mouser.com/datasheet/2/405/ne555-1.pdf",
        "LifecycleStatus": null,
        "ROHSStatus": "RoHS Compliant",
        "MouserPartNumber": format!("595-{}", part_number),
        "ProductDetailUrl": format!("https://www.mouser.com/ProductDetail/595-{}", part_number),
        "Category": category,
        "Availability": "12000 In Stock",
        "ProductAttributes": [
            { "AttributeName": "Packaging", "AttributeValue": "Reel" },
            { "AttributeName": "Mounting Type", "AttributeValue": "-" }
        ],
        "PriceBreaks": [
            { "Quantity": 1, "Price": "$0.45", "Currency": "USD" },
            { "Quantity": 10, "Price": "$0.39", "Currency": "USD" }
        ]
    })
}
