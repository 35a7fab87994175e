//! Path evaluation over supplier JSON
//!
//! Supplier payloads are kept as [`serde_json::Value`] trees (null, scalar,
//! ordered list or string-keyed map). A path is a dot-separated list of
//! segments: a segment made only of ASCII digits indexes into a list, any
//! other segment is a map key. Evaluation never fails loudly; anything that
//! does not line up yields `None`.

use serde_json::Value;

/// Evaluate `path` against `tree`
///
/// Returns `None` for a missing key, an out-of-range index, a segment applied
/// to the wrong kind of container, or a JSON `null` at the end of the path.
pub fn extract<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.split('.') {
        current = step(current, segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match parse_index(segment) {
        Some(index) => current.as_array()?.get(index),
        None => current.as_object()?.get(segment),
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Render a scalar as text
///
/// Strings are returned as-is, numbers and booleans in their JSON spelling.
/// Lists, maps and null have no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text of a scalar, treating empty strings as absent
pub fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty())
}
