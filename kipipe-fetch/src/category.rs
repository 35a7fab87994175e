//! Category path derivation and resolution
//!
//! A supplier's category arrives as a nested object (`Name` plus a list of
//! `ChildCategories`). [`path_of`] flattens it into a [`CategoryPath`] and
//! [`CategoryResolver`] maps the path's leaf label onto an internal
//! `category_id` through the persisted mapping table.

use crate::db::CatalogStore;
use crate::error::{FetchError, FetchResult};
use crate::types::CategoryPath;
use crate::value::non_empty_text;
use serde_json::Value;

const NAME_KEY: &str = "Name";
const CHILDREN_KEY: &str = "ChildCategories";

/// Collect category names from root to leaf, following the first child at
/// every level
///
/// Anything that is not an object ends the walk, so a missing or malformed
/// representation yields an empty path.
pub fn path_of(category: &Value) -> CategoryPath {
    let mut segments = Vec::new();
    let mut current = Some(category);

    while let Some(node) = current.and_then(Value::as_object) {
        if let Some(name) = non_empty_text(node.get(NAME_KEY)) {
            segments.push(name.trim().to_string());
        }
        current = node
            .get(CHILDREN_KEY)
            .and_then(Value::as_array)
            .and_then(|children| children.first());
    }

    CategoryPath::new(segments)
}

/// One supplier's view of the part's category
#[derive(Debug, Clone)]
pub struct CategoryCandidate {
    pub supplier: String,
    pub path: CategoryPath,
}

impl CategoryCandidate {
    pub fn new(supplier: impl Into<String>, path: CategoryPath) -> Self {
        Self {
            supplier: supplier.into(),
            path,
        }
    }
}

/// Successful resolution across suppliers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub category_id: i64,
    /// Index into the candidate list of the supplier whose label resolved
    pub candidate: usize,
    pub label: String,
}

pub struct CategoryResolver<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Resolve one supplier's path by exact match on its leaf label
    pub async fn resolve(&self, supplier: &str, path: &CategoryPath) -> FetchResult<Option<i64>> {
        let Some(label) = path.leaf_label() else {
            return Ok(None);
        };
        Ok(self.store.category_id_for(supplier, label).await?)
    }

    /// Resolve in priority order, borrowing a later supplier's category when
    /// an earlier one does not map
    ///
    /// When nothing maps, every non-empty label is queued for curation
    /// (one entry per supplier) and the request fails as unresolved.
    pub async fn resolve_first(
        &self,
        part_number: &str,
        candidates: &[CategoryCandidate],
    ) -> FetchResult<Resolution> {
        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(category_id) = self.resolve(&candidate.supplier, &candidate.path).await? {
                if index > 0 {
                    tracing::info!(
                        part_number = %part_number,
                        supplier = %candidate.supplier,
                        category_id,
                        "Borrowed category from secondary supplier"
                    );
                }
                return Ok(Resolution {
                    category_id,
                    candidate: index,
                    label: candidate.path.leaf_label().unwrap_or_default().to_string(),
                });
            }
        }

        let mut labels = Vec::new();
        for candidate in candidates {
            let Some(label) = candidate.path.leaf_label() else {
                continue;
            };
            self.store
                .queue_unmapped_category(&candidate.supplier, label)
                .await?;
            tracing::warn!(
                part_number = %part_number,
                supplier = %candidate.supplier,
                supplier_category = label,
                "Queued unmapped supplier category"
            );
            labels.push(label.to_string());
        }

        Err(FetchError::CategoryUnresolved {
            part_number: part_number.to_string(),
            labels,
        })
    }
}
