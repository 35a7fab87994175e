//! Field normalization applied after recipe synthesis

use crate::recipes::ParamLookup;
use crate::types::{CategoryPath, PriceBreak};
use crate::value::non_empty_text;
use serde_json::Value;

pub const SURFACE_MOUNT: &str = "Surface Mount";
pub const THROUGH_HOLE: &str = "Through-Hole";

/// `"Yes"` when the supplier's status mentions RoHS in any case, else `"No"`
pub fn normalize_rohs_status(status: Option<&str>) -> String {
    let compliant = status.is_some_and(|s| s.to_lowercase().contains("rohs"));
    if compliant { "Yes" } else { "No" }.to_string()
}

/// Remove every parenthetical group and the whitespace in front of it
///
/// `"-40°C ~ 125°C (TA)"` becomes `"-40°C ~ 125°C"`. An unclosed `(` is kept.
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        out.push_str(rest[..open].trim_end());
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Operating temperature with qualifiers such as `(TA)` removed
pub fn operating_temperature(lookup: &ParamLookup<'_>) -> Option<String> {
    lookup
        .find(&["Operating Temperature", "Operating Temperature - Junction"])
        .map(|t| strip_parentheticals(&t))
        .filter(|t| !t.is_empty())
}

fn classify_mounting(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    if text.contains("surface mount") {
        Some(SURFACE_MOUNT)
    } else if text.contains("through-hole") || text.contains("through hole") {
        Some(THROUGH_HOLE)
    } else {
        None
    }
}

/// Mounting style from the explicit parameter, else from the category path
pub fn infer_mounting_type(lookup: &ParamLookup<'_>, path: &CategoryPath) -> Option<String> {
    lookup
        .get("Mounting Type")
        .and_then(|m| classify_mounting(&m))
        .or_else(|| classify_mounting(&path.joined()))
        .map(str::to_string)
}

/// Normalize supplier price breaks
///
/// Quantity comes from `BreakQuantity` or `Quantity`, price from `UnitPrice`
/// or `Price` with any `$` removed. Entries missing either are dropped.
pub fn normalize_price_breaks(pricing: &[Value]) -> Vec<PriceBreak> {
    pricing
        .iter()
        .filter_map(|entry| {
            let quantity = ["BreakQuantity", "Quantity"]
                .iter()
                .find_map(|k| entry.get(*k).and_then(parse_quantity))?;
            let unit_price = ["UnitPrice", "Price"]
                .iter()
                .find_map(|k| non_empty_text(entry.get(*k)))
                .map(|p| p.replace('$', "").trim().to_string())
                .filter(|p| !p.is_empty())?;
            Some(PriceBreak {
                quantity,
                unit_price,
            })
        })
        .collect()
}

fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}
