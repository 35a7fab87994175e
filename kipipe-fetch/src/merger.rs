//! Combine per-supplier data into the final record
//!
//! The base supplier's listing fills the `supplier_1*` columns. When another
//! supplier also returned data its listing fills `supplier_2*`; otherwise
//! those columns stay unset and are left out of the serialized record.

use crate::mapping::{Field, FlatFields};
use crate::types::{NormalizedComponent, SecondaryListing, SupplierListing};

/// Record fields derived from the base supplier, before supplier columns
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDraft {
    pub manufacturer_part_number: String,
    pub manufacturer: Option<String>,
    pub description: String,
    pub component_value: String,
    pub datasheet_url: Option<String>,
    pub product_status: Option<String>,
    pub rohs_status: String,
    pub package_case: Option<String>,
    pub mounting_type: Option<String>,
    pub operating_temperature: Option<String>,
    pub category_id: i64,
    pub internal_part_id: String,
    pub parameters: String,
}

/// Identifying fields of one supplier's mapped data
pub fn listing_of(supplier: &str, fields: &FlatFields) -> SupplierListing {
    SupplierListing {
        supplier: supplier.to_string(),
        part_number: fields.text(Field::SupplierPartNumber),
        product_url: fields.text(Field::SupplierProductUrl),
    }
}

pub struct SupplierMerger;

impl SupplierMerger {
    /// Attach supplier listings to a draft
    pub fn merge(
        draft: ComponentDraft,
        base: SupplierListing,
        other: Option<SupplierListing>,
    ) -> NormalizedComponent {
        NormalizedComponent {
            manufacturer_part_number: draft.manufacturer_part_number,
            manufacturer: draft.manufacturer,
            description: draft.description,
            component_value: draft.component_value,
            datasheet_url: draft.datasheet_url,
            product_status: draft.product_status,
            rohs_status: draft.rohs_status,
            package_case: draft.package_case,
            mounting_type: draft.mounting_type,
            operating_temperature: draft.operating_temperature,
            category_id: draft.category_id,
            internal_part_id: draft.internal_part_id,
            parameters: draft.parameters,
            supplier_1: base.supplier,
            supplier_part_number_1: base.part_number,
            supplier_product_url_1: base.product_url,
            secondary: other.map(SecondaryListing::from),
        }
    }
}
