//! Internal part id allocation
//!
//! Ids look like `<PREFIX>-NNNN`: the hierarchical category prefix, a dash,
//! and a per-prefix sequence number zero-padded to at least four digits.

use crate::db::CatalogStore;
use crate::error::{FetchError, FetchResult};
use crate::types::CategoryRecord;

/// Minimum width of the numeric suffix
const SEQUENCE_WIDTH: usize = 4;

/// Format an id from a prefix and sequence number (never truncates)
pub fn format_part_id(prefix: &str, sequence: u64) -> String {
    format!("{}-{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}

/// Numeric suffix after the last `-`
pub fn parse_sequence(part_id: &str) -> Option<u64> {
    let (_, suffix) = part_id.rsplit_once('-')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Id following `last` under `prefix` (first id when there is no `last`)
///
/// A `last` whose suffix is not numeric is treated like no prior id.
pub fn next_part_id(prefix: &str, last: Option<&str>) -> String {
    let next = last.and_then(parse_sequence).map_or(1, |n| n + 1);
    format_part_id(prefix, next)
}

/// Prefix for a category: its own prefix, preceded by the parent's when it
/// has one (`"IC"` + `"TMR"` → `"IC-TMR"`)
pub fn hierarchical_prefix(category: &CategoryRecord, parent: Option<&CategoryRecord>) -> String {
    match parent {
        Some(parent) => format!("{}-{}", parent.prefix, category.prefix),
        None => category.prefix.clone(),
    }
}

/// Allocates internal part ids through a [`CatalogStore`]
pub struct PartIdAllocator<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> PartIdAllocator<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Full prefix for a category id
    ///
    /// A missing category is a data-integrity fault. A missing parent is
    /// logged and the category's own prefix is used.
    pub async fn prefix_for(&self, category_id: i64) -> FetchResult<String> {
        let category = self
            .store
            .category_details(category_id)
            .await?
            .ok_or(FetchError::CategoryDetailsMissing(category_id))?;

        let parent = match category.parent_id {
            Some(parent_id) => {
                let parent = self.store.category_details(parent_id).await?;
                if parent.is_none() {
                    tracing::warn!(
                        category_id,
                        parent_id,
                        "Parent category missing, using category prefix alone"
                    );
                }
                parent
            }
            None => None,
        };

        Ok(hierarchical_prefix(&category, parent.as_ref()))
    }

    /// Allocate the next id for a category
    ///
    /// The store's counter is atomic, so concurrent allocations under one
    /// prefix never hand out the same id.
    pub async fn allocate(&self, category_id: i64) -> FetchResult<String> {
        let prefix = self.prefix_for(category_id).await?;
        let sequence = self.store.next_sequence_value(&prefix).await?;
        let part_id = format_part_id(&prefix, sequence);

        tracing::debug!(category_id, prefix = %prefix, part_id = %part_id, "Allocated internal part id");

        Ok(part_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(prefix: &str) -> CategoryRecord {
        CategoryRecord {
            category_id: 1,
            name: "n".to_string(),
            prefix: prefix.to_string(),
            parent_id: None,
        }
    }

    #[test]
    fn test_first_id_for_prefix() {
        assert_eq!(next_part_id("RES", None), "RES-0001");
    }

    #[test]
    fn test_sequential_id() {
        assert_eq!(next_part_id("CAP", Some("CAP-0042")), "CAP-0043");
    }

    #[test]
    fn test_no_truncation_past_9999() {
        assert_eq!(next_part_id("X", Some("X-9999")), "X-10000");
        assert_eq!(next_part_id("X", Some("X-10000")), "X-10001");
    }

    #[test]
    fn test_suffix_parsed_after_last_dash() {
        assert_eq!(next_part_id("IC-TMR", Some("IC-TMR-0009")), "IC-TMR-0010");
        assert_eq!(parse_sequence("IC-TMR-abc"), None);
        assert_eq!(next_part_id("IC", Some("garbage")), "IC-0001");
    }

    #[test]
    fn test_hierarchical_prefix() {
        let child = category("TMR");
        let parent = category("IC");
        assert_eq!(hierarchical_prefix(&child, Some(&parent)), "IC-TMR");
        assert_eq!(hierarchical_prefix(&child, None), "TMR");
    }
}
