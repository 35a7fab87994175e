//! End-to-end component processing against stub suppliers

mod helpers;

use helpers::*;
use kipipe_common::config::BaseSelection;
use kipipe_fetch::db::categories::{assign_mapping, list_unmapped};
use kipipe_fetch::db::components::load_component;
use kipipe_fetch::db::CatalogStore;
use kipipe_fetch::types::PriceBreak;
use kipipe_fetch::{FetchError, SqliteCatalogStore};
use serde_json::json;
use std::sync::Arc;

const MOUSER_TIMERS: &str = "Timers & Support Products";

#[tokio::test]
async fn test_single_supplier_timer() {
    let pool = seeded_pool().await;
    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool));
    let processor = processor(
        store,
        vec![digikey_source(StubSupplier::new("Digi-Key").with("NE555DR", digikey_ne555dr()))],
        BaseSelection::Resolved,
    );

    let component = processor.try_process("NE555DR").await.unwrap();

    assert_eq!(component.manufacturer_part_number, "NE555DR");
    assert_eq!(component.manufacturer.as_deref(), Some("Texas Instruments"));
    // No recipe covers timers: raw description, part number as value
    assert_eq!(component.component_value, "NE555DR");
    assert_eq!(component.description, NE555DR_DESCRIPTION);
    assert_eq!(component.category_id, TIMER_CATEGORY);
    assert_eq!(component.internal_part_id, "IC-TMR-0001");
    assert_eq!(component.rohs_status, "Yes");
    assert_eq!(component.product_status.as_deref(), Some("Active"));
    assert_eq!(component.mounting_type.as_deref(), Some("Surface Mount"));
    assert_eq!(component.operating_temperature.as_deref(), Some("0°C ~ 70°C"));
    assert_eq!(
        component.package_case.as_deref(),
        Some("8-SOIC (0.154\", 3.90mm Width)")
    );

    assert_eq!(component.supplier_1, "Digi-Key");
    assert_eq!(component.supplier_part_number_1.as_deref(), Some("296-NE555DR-1-ND"));
    assert_eq!(component.supplier_2(), None);

    let params = component.decoded_parameters().unwrap();
    assert_eq!(params.availability, Some(json!(25000)));
    assert_eq!(params.category.as_deref(), Some("Integrated Circuits (ICs)"));
    assert_eq!(
        params.price_breaks_usd,
        vec![
            PriceBreak {
                quantity: 1,
                unit_price: "0.42".to_string()
            },
            PriceBreak {
                quantity: 10,
                unit_price: "0.368".to_string()
            },
        ]
    );

    let encoded = serde_json::to_value(&component).unwrap();
    assert!(encoded.get("supplier_2").is_none());
}

#[tokio::test]
async fn test_both_suppliers_fill_second_listing() {
    let pool = seeded_pool().await;
    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(pool));
    let processor = processor(
        store,
        vec![
            digikey_source(StubSupplier::new("Digi-Key").with("NE555DR", digikey_ne555dr())),
            mouser_source(StubSupplier::new("Mouser").with(
                "NE555DR",
                mouser_part("NE555DR", MOUSER_TIMERS, "Timers & Support Products SOIC-8"),
            )),
        ],
        BaseSelection::Resolved,
    );

    let component = processor.try_process("NE555DR").await.unwrap();

    assert_eq!(component.supplier_1, "Digi-Key");
    assert_eq!(component.supplier_2(), Some("Mouser"));
    let secondary = component.secondary.as_ref().unwrap();
    assert_eq!(secondary.supplier_part_number_2.as_deref(), Some("595-NE555DR"));
    assert_eq!(
        secondary.supplier_product_url_2.as_deref(),
        Some("https://www.mouser.com/ProductDetail/595-NE555DR")
    );
    // Base data still comes from the primary
    assert_eq!(component.description, NE555DR_DESCRIPTION);
}

#[tokio::test]
async fn test_unresolved_queues_every_supplier_label() {
    let pool = seeded_pool().await;
    let recording = Arc::new(RecordingStore::new(pool.clone()));
    let unknown = digikey_product(
        "XYZ123",
        &["Sensors, Transducers", "Magnetic Sensors"],
        json!([]),
        "SENSOR HALL",
    );
    let processor = processor(
        recording.clone(),
        vec![
            digikey_source(StubSupplier::new("Digi-Key").with("XYZ123", unknown)),
            mouser_source(StubSupplier::new("Mouser").with(
                "XYZ123",
                mouser_part("XYZ123", "Board Mount Hall Effect", "Hall sensor"),
            )),
        ],
        BaseSelection::Resolved,
    );

    assert!(processor.process("XYZ123").await.is_none());

    assert_eq!(
        recording.queued(),
        vec![
            ("Digi-Key".to_string(), "Magnetic Sensors".to_string()),
            ("Mouser".to_string(), "Board Mount Hall Effect".to_string()),
        ]
    );
    assert_eq!(list_unmapped(&pool).await.unwrap().len(), 2);
    assert!(load_component(&pool, "XYZ123").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_secondary_category_is_not_queued() {
    let pool = seeded_pool().await;
    let recording = Arc::new(RecordingStore::new(pool.clone()));
    let unknown = digikey_product(
        "XYZ123",
        &["Sensors, Transducers", "Magnetic Sensors"],
        json!([]),
        "SENSOR HALL",
    );
    let processor = processor(
        recording.clone(),
        vec![
            digikey_source(StubSupplier::new("Digi-Key").with("XYZ123", unknown)),
            mouser_source(
                StubSupplier::new("Mouser").with("XYZ123", mouser_part("XYZ123", "", "Hall sensor")),
            ),
        ],
        BaseSelection::Resolved,
    );

    let err = processor.try_process("XYZ123").await.unwrap_err();

    match err {
        FetchError::CategoryUnresolved { labels, .. } => {
            assert_eq!(labels, vec!["Magnetic Sensors".to_string()]);
        }
        other => panic!("expected CategoryUnresolved, got {:?}", other),
    }
    assert_eq!(recording.queued().len(), 1);
}

async fn borrowing_processor(base_selection: BaseSelection) -> kipipe_fetch::ComponentProcessor {
    let pool = seeded_pool().await;
    assign_mapping(&pool, "Mouser", MOUSER_TIMERS, TIMER_CATEGORY)
        .await
        .unwrap();

    let unmapped = digikey_product(
        "NE555DR",
        &["Integrated Circuits (ICs)", "Clock/Timing", "Programmable Timers and Oscillators"],
        json!([]),
        NE555DR_DESCRIPTION,
    );

    processor(
        Arc::new(SqliteCatalogStore::new(pool)),
        vec![
            digikey_source(StubSupplier::new("Digi-Key").with("NE555DR", unmapped)),
            mouser_source(StubSupplier::new("Mouser").with(
                "NE555DR",
                mouser_part("NE555DR", MOUSER_TIMERS, "Timers & Support Products SOIC-8"),
            )),
        ],
        base_selection,
    )
}

#[tokio::test]
async fn test_borrowed_category_makes_secondary_the_base() {
    let processor = borrowing_processor(BaseSelection::Resolved).await;

    let component = processor.try_process("NE555DR").await.unwrap();

    assert_eq!(component.category_id, TIMER_CATEGORY);
    assert_eq!(component.internal_part_id, "IC-TMR-0001");
    assert_eq!(component.supplier_1, "Mouser");
    assert_eq!(component.supplier_part_number_1.as_deref(), Some("595-NE555DR"));
    assert_eq!(component.supplier_2(), Some("Digi-Key"));
    assert_eq!(component.description, "Timers & Support Products SOIC-8");
    assert_eq!(component.rohs_status, "Yes");

    let params = component.decoded_parameters().unwrap();
    assert_eq!(params.category.as_deref(), Some(MOUSER_TIMERS));
    assert_eq!(params.price_breaks_usd[0].unit_price, "0.45");
}

#[tokio::test]
async fn test_borrowed_category_keeps_primary_base_when_configured() {
    let processor = borrowing_processor(BaseSelection::Primary).await;

    let component = processor.try_process("NE555DR").await.unwrap();

    assert_eq!(component.category_id, TIMER_CATEGORY);
    assert_eq!(component.supplier_1, "Digi-Key");
    assert_eq!(component.supplier_2(), Some("Mouser"));
    assert_eq!(component.description, NE555DR_DESCRIPTION);
}

#[tokio::test]
async fn test_not_found_anywhere() {
    let pool = seeded_pool().await;
    let digikey = Arc::new(StubSupplier::new("Digi-Key"));
    let processor = processor(
        Arc::new(SqliteCatalogStore::new(pool)),
        vec![
            kipipe_fetch::SupplierSource::new(
                digikey.clone(),
                kipipe_fetch::mapping::SupplierProfile::digikey(),
            ),
            mouser_source(StubSupplier::new("Mouser")),
        ],
        BaseSelection::Resolved,
    );

    let err = processor.try_process("DOESNOTEXIST").await.unwrap_err();

    assert!(matches!(err, FetchError::NotFound(ref pn) if pn == "DOESNOTEXIST"));
    assert_eq!(digikey.calls(), 1);
}

#[tokio::test]
async fn test_mapping_to_missing_category_is_integrity_fault() {
    let pool = seeded_pool().await;
    map_dangling(&pool, "Broken Category").await;
    let product = digikey_product("BROKEN", &["Misc", "Broken Category"], json!([]), "BROKEN PART");
    let processor = processor(
        Arc::new(SqliteCatalogStore::new(pool)),
        vec![digikey_source(StubSupplier::new("Digi-Key").with("BROKEN", product))],
        BaseSelection::Resolved,
    );

    let err = processor.try_process("BROKEN").await.unwrap_err();

    assert!(matches!(err, FetchError::CategoryDetailsMissing(DANGLING_CATEGORY)));
}

#[tokio::test]
async fn test_repeated_processing_allocates_sequential_ids() {
    let pool = seeded_pool().await;
    let processor = processor(
        Arc::new(SqliteCatalogStore::new(pool)),
        vec![digikey_source(StubSupplier::new("Digi-Key").with("NE555DR", digikey_ne555dr()))],
        BaseSelection::Resolved,
    );

    let first = processor.try_process("NE555DR").await.unwrap();
    let second = processor.try_process("NE555DR").await.unwrap();

    assert_eq!(first.internal_part_id, "IC-TMR-0001");
    assert_eq!(second.internal_part_id, "IC-TMR-0002");
}

#[tokio::test]
async fn test_resistor_recipe_end_to_end() {
    let pool = seeded_pool().await;
    let product = digikey_product(
        "RC0603FR-0710KL",
        &["Resistors", "Chip Resistor - Surface Mount"],
        json!([
            { "ParameterText": "Resistance", "ValueText": "10 kOhms" },
            { "ParameterText": "Tolerance", "ValueText": "±1%" },
            { "ParameterText": "Power (Watts)", "ValueText": "0.1W, 1/10W" },
            { "ParameterText": "Composition", "ValueText": "Thick Film" },
            { "ParameterText": "Package / Case", "ValueText": "0603 (1608 Metric)" },
            { "ParameterText": "Operating Temperature", "ValueText": "-55°C ~ 155°C" }
        ]),
        "RES 10K OHM 1% 1/10W 0603",
    );
    let processor = processor(
        Arc::new(SqliteCatalogStore::new(pool)),
        vec![digikey_source(StubSupplier::new("Digi-Key").with("RC0603FR-0710KL", product))],
        BaseSelection::Resolved,
    );

    let component = processor.try_process("RC0603FR-0710KL").await.unwrap();

    assert_eq!(component.internal_part_id, "RES-0001");
    assert_eq!(component.component_value, "10kΩ, ±1%, 0.1W");
    assert_eq!(
        component.description,
        "Chip Resistor, Thick Film, 10 kOhms, ±1%, 0.1W, 1/10W, 0603 (1608 Metric)"
    );
    // No explicit mounting parameter: inferred from the category path
    assert_eq!(component.mounting_type.as_deref(), Some("Surface Mount"));
    assert_eq!(component.operating_temperature.as_deref(), Some("-55°C ~ 155°C"));
}

#[tokio::test]
async fn test_process_and_store_persists_record() {
    let pool = seeded_pool().await;
    let processor = processor(
        Arc::new(SqliteCatalogStore::new(pool.clone())),
        vec![digikey_source(StubSupplier::new("Digi-Key").with("NE555DR", digikey_ne555dr()))],
        BaseSelection::Resolved,
    );

    let component = processor.process_and_store("NE555DR").await.unwrap();
    let stored = load_component(&pool, "NE555DR").await.unwrap().unwrap();

    assert_eq!(stored, component);

    // A refresh replaces the row in place with a fresh id
    let refreshed = processor.process_and_store("NE555DR").await.unwrap();
    let stored = load_component(&pool, "NE555DR").await.unwrap().unwrap();
    assert_eq!(stored.internal_part_id, refreshed.internal_part_id);
    assert_eq!(stored.internal_part_id, "IC-TMR-0002");
}
