//! Core data types for the component pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Category types
// ============================================================================

/// Ordered supplier category names, broadest first
///
/// Only ever used to select recipes and to look up mappings. The resolved
/// `category_id` is the identity that gets stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most specific non-empty name, used as the mapping-table key
    pub fn leaf_label(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }

    /// All segments joined with single spaces
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Internal taxonomy node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub category_id: i64,
    pub name: String,
    pub prefix: String,
    pub parent_id: Option<i64>,
}

/// Entry waiting in the curation queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedCategory {
    pub id: i64,
    pub supplier_name: String,
    pub supplier_category: String,
}

// ============================================================================
// Output record
// ============================================================================

/// One normalized price break
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreak {
    pub quantity: u64,
    pub unit_price: String,
}

/// Side-channel data stored JSON-encoded in the `parameters` column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentParameters {
    pub availability: Option<serde_json::Value>,
    pub category: Option<String>,
    pub price_breaks_usd: Vec<PriceBreak>,
}

/// Identifying data of one supplier's listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierListing {
    pub supplier: String,
    pub part_number: Option<String>,
    pub product_url: Option<String>,
}

/// The other supplier's listing, stored in the `supplier_2*` columns
///
/// Serialized as its three keys side by side in the record; every key is
/// written, null or not, once a second supplier had data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryListing {
    pub supplier_2: String,
    pub supplier_part_number_2: Option<String>,
    pub supplier_product_url_2: Option<String>,
}

impl From<SupplierListing> for SecondaryListing {
    fn from(listing: SupplierListing) -> Self {
        Self {
            supplier_2: listing.supplier,
            supplier_part_number_2: listing.part_number,
            supplier_product_url_2: listing.product_url,
        }
    }
}

/// Final catalog record for one manufacturer part number
///
/// `description` and `component_value` are never empty. The `supplier_2*`
/// keys are all present or all omitted, depending only on whether a second
/// supplier had data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedComponent {
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
    /// JSON-encoded [`ComponentParameters`]
    pub parameters: String,
    pub supplier_1: String,
    pub supplier_part_number_1: Option<String>,
    pub supplier_product_url_1: Option<String>,
    #[serde(flatten)]
    pub secondary: Option<SecondaryListing>,
}

impl NormalizedComponent {
    /// Decode the `parameters` side channel
    pub fn decoded_parameters(&self) -> serde_json::Result<ComponentParameters> {
        serde_json::from_str(&self.parameters)
    }

    /// Name of the second supplier, if one had data
    pub fn supplier_2(&self) -> Option<&str> {
        self.secondary.as_ref().map(|s| s.supplier_2.as_str())
    }
}
