//! Supplier field mapping
//!
//! Each supplier is described by a [`SupplierProfile`]: its display name and
//! a declarative table from standard fields to paths inside the supplier's
//! JSON. [`map_fields`] applies the table and produces [`FlatFields`] in
//! which every field named by the table is present, holding `Null` when the
//! path did not resolve.

use crate::value::{self, non_empty_text};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Standard field names shared by all suppliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ManufacturerPartNumber,
    Manufacturer,
    Description,
    DatasheetUrl,
    ProductStatus,
    RohsStatus,
    SupplierPartNumber,
    SupplierProductUrl,
    Category,
    Parameters,
    Pricing,
    QuantityAvailable,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ManufacturerPartNumber => "manufacturer_part_number",
            Field::Manufacturer => "manufacturer",
            Field::Description => "description",
            Field::DatasheetUrl => "datasheet_url",
            Field::ProductStatus => "product_status",
            Field::RohsStatus => "rohs_status",
            Field::SupplierPartNumber => "supplier_part_number",
            Field::SupplierProductUrl => "supplier_product_url",
            Field::Category => "supplier_category",
            Field::Parameters => "parameters_list",
            Field::Pricing => "pricing_list",
            Field::QuantityAvailable => "quantity_available",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a standard field comes from in the supplier JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Dotted path evaluated with [`value::extract`]
    Path(String),
    /// Flat category string, wrapped as `{"Name": <string>}` so category
    /// handling sees the same shape as a nested category object
    FlatCategory(String),
}

/// Immutable per-supplier configuration
#[derive(Debug, Clone)]
pub struct SupplierProfile {
    pub name: String,
    pub fields: Vec<(Field, FieldSource)>,
}

impl SupplierProfile {
    pub fn new(name: impl Into<String>, fields: Vec<(Field, FieldSource)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Digi-Key product search (v4) layout
    pub fn digikey() -> Self {
        use Field::*;
        Self::new(
            "Digi-Key",
            vec![
                (ManufacturerPartNumber, path("ManufacturerProductNumber")),
                (Manufacturer, path("Manufacturer.Name")),
                (Description, path("Description.DetailedDescription")),
                (DatasheetUrl, path("DatasheetUrl")),
                (ProductStatus, path("ProductStatus.Status")),
                (RohsStatus, path("Classifications.RohsStatus")),
                (SupplierPartNumber, path("ProductVariations.0.DigiKeyProductNumber")),
                (SupplierProductUrl, path("ProductUrl")),
                (Category, path("Category")),
                (Parameters, path("Parameters")),
                (Pricing, path("ProductVariations.0.StandardPricing")),
                (QuantityAvailable, path("QuantityAvailable")),
            ],
        )
    }

    /// Mouser keyword search layout (flat category string)
    pub fn mouser() -> Self {
        use Field::*;
        Self::new(
            "Mouser",
            vec![
                (ManufacturerPartNumber, path("ManufacturerPartNumber")),
                (Manufacturer, path("Manufacturer")),
                (Description, path("Description")),
                (DatasheetUrl, path("DataSheetUrl")),
                (ProductStatus, path("LifecycleStatus")),
                (RohsStatus, path("ROHSStatus")),
                (SupplierPartNumber, path("MouserPartNumber")),
                (SupplierProductUrl, path("ProductDetailUrl")),
                (Category, FieldSource::FlatCategory("Category".to_string())),
                (Parameters, path("ProductAttributes")),
                (Pricing, path("PriceBreaks")),
                (QuantityAvailable, path("Availability")),
            ],
        )
    }
}

fn path(p: &str) -> FieldSource {
    FieldSource::Path(p.to_string())
}

/// Flat standard-field view of one supplier payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFields {
    values: BTreeMap<Field, Value>,
}

impl FlatFields {
    /// Raw value of a field (`Null` when absent)
    pub fn get(&self, field: Field) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(&field).unwrap_or(&NULL)
    }

    /// Whether the mapping table populated this key (even with `Null`)
    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Non-empty text of a scalar field
    pub fn text(&self, field: Field) -> Option<String> {
        non_empty_text(Some(self.get(field)))
    }

    /// Elements of a list field (empty when absent or not a list)
    pub fn list(&self, field: Field) -> &[Value] {
        self.get(field).as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set(&mut self, field: Field, value: Value) {
        self.values.insert(field, value);
    }
}

/// Apply a supplier's mapping table to its raw payload
pub fn map_fields(tree: &Value, profile: &SupplierProfile) -> FlatFields {
    let mut fields = FlatFields::default();
    for (field, source) in &profile.fields {
        fields.set(*field, resolve_source(tree, source));
    }
    fields
}

/// Evaluate a single field source against the raw payload
pub fn resolve_source(tree: &Value, source: &FieldSource) -> Value {
    match source {
        FieldSource::Path(p) => value::extract(tree, p).cloned().unwrap_or(Value::Null),
        FieldSource::FlatCategory(key) => match non_empty_text(value::extract(tree, key)) {
            Some(name) => json!({ "Name": name }),
            None => Value::Null,
        },
    }
}
