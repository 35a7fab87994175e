//! Component processor
//!
//! Turns one manufacturer part number into a [`NormalizedComponent`]:
//!
//! 1. Query every configured supplier concurrently
//! 2. Resolve the internal category, primary supplier first, borrowing from
//!    the next supplier when needed
//! 3. Map the base supplier's fields and run the recipe table
//! 4. Normalize RoHS, temperature, mounting type and price breaks
//! 5. Allocate the internal part id
//! 6. Attach supplier listings
//!
//! Suppliers are listed in priority order; the first is the primary.

use crate::allocator::PartIdAllocator;
use crate::category::{path_of, CategoryCandidate, CategoryResolver};
use crate::db::CatalogStore;
use crate::error::{FetchError, FetchResult};
use crate::mapping::{map_fields, Field, FlatFields, SupplierProfile};
use crate::merger::{listing_of, ComponentDraft, SupplierMerger};
use crate::normalize::{
    infer_mounting_type, normalize_price_breaks, normalize_rohs_status, operating_temperature,
};
use crate::recipes::{ParamLookup, RecipeBook};
use crate::suppliers::SupplierAdapter;
use crate::types::{CategoryPath, ComponentParameters, NormalizedComponent};
use futures::future::join_all;
use kipipe_common::config::BaseSelection;
use serde_json::Value;
use std::sync::Arc;

/// A supplier adapter with the mapping table for its payloads
#[derive(Clone)]
pub struct SupplierSource {
    pub adapter: Arc<dyn SupplierAdapter>,
    pub profile: SupplierProfile,
}

impl SupplierSource {
    pub fn new(adapter: Arc<dyn SupplierAdapter>, profile: SupplierProfile) -> Self {
        Self { adapter, profile }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

/// One supplier's mapped response
struct SupplierHit<'a> {
    source: &'a SupplierSource,
    fields: FlatFields,
    path: CategoryPath,
}

pub struct ComponentProcessor {
    store: Arc<dyn CatalogStore>,
    suppliers: Vec<SupplierSource>,
    recipes: RecipeBook,
    base_selection: BaseSelection,
}

impl ComponentProcessor {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        suppliers: Vec<SupplierSource>,
        recipes: RecipeBook,
        base_selection: BaseSelection,
    ) -> Self {
        Self {
            store,
            suppliers,
            recipes,
            base_selection,
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub fn suppliers(&self) -> &[SupplierSource] {
        &self.suppliers
    }

    /// Build the record for a part number, or `None` after logging why not
    pub async fn process(&self, part_number: &str) -> Option<NormalizedComponent> {
        match self.try_process(part_number).await {
            Ok(component) => Some(component),
            Err(e) => {
                log_failure(part_number, &e);
                None
            }
        }
    }

    /// Build and persist the record for a part number
    pub async fn process_and_store(&self, part_number: &str) -> FetchResult<NormalizedComponent> {
        let component = self.try_process(part_number).await?;
        self.store.upsert_component(&component).await?;
        Ok(component)
    }

    /// Build the record for a part number
    pub async fn try_process(&self, part_number: &str) -> FetchResult<NormalizedComponent> {
        tracing::info!(part_number = %part_number, "Processing part");

        let responses = join_all(self.suppliers.iter().map(|s| s.adapter.fetch(part_number))).await;

        let hits: Vec<SupplierHit<'_>> = self
            .suppliers
            .iter()
            .zip(responses)
            .filter_map(|(source, raw)| raw.map(|raw| hit(source, &raw)))
            .collect();

        if hits.is_empty() {
            return Err(FetchError::NotFound(part_number.to_string()));
        }

        let candidates: Vec<CategoryCandidate> = hits
            .iter()
            .map(|h| CategoryCandidate::new(h.source.name(), h.path.clone()))
            .collect();

        let resolution = CategoryResolver::new(self.store.as_ref())
            .resolve_first(part_number, &candidates)
            .await?;

        let base_index = match self.base_selection {
            BaseSelection::Resolved => resolution.candidate,
            BaseSelection::Primary => 0,
        };
        let base = &hits[base_index];

        tracing::debug!(
            part_number = %part_number,
            base = %base.source.name(),
            category_id = resolution.category_id,
            category_path = %base.path,
            "Selected base supplier"
        );

        let mut draft = self.draft(part_number, base, resolution.category_id)?;
        draft.internal_part_id = PartIdAllocator::new(self.store.as_ref())
            .allocate(resolution.category_id)
            .await?;

        let other = hits
            .iter()
            .enumerate()
            .find(|(i, _)| *i != base_index)
            .map(|(_, h)| listing_of(h.source.name(), &h.fields));

        let component =
            SupplierMerger::merge(draft, listing_of(base.source.name(), &base.fields), other);

        tracing::info!(
            part_number = %part_number,
            internal_part_id = %component.internal_part_id,
            component_value = %component.component_value,
            "Part processed"
        );

        Ok(component)
    }

    /// Every record field that comes from the base supplier alone
    fn draft(
        &self,
        part_number: &str,
        base: &SupplierHit<'_>,
        category_id: i64,
    ) -> FetchResult<ComponentDraft> {
        let fields = &base.fields;
        let path = &base.path;

        let mpn = fields
            .text(Field::ManufacturerPartNumber)
            .unwrap_or_else(|| part_number.to_string());

        let synthesized = self.recipes.apply(fields, path, &mpn);
        let description = if synthesized.description.trim().is_empty() {
            tracing::debug!(part_number = %part_number, "No description available, using part number");
            mpn.clone()
        } else {
            synthesized.description
        };

        let lookup = ParamLookup::new(fields.list(Field::Parameters));

        let parameters = ComponentParameters {
            availability: Some(fields.get(Field::QuantityAvailable).clone())
                .filter(|v| !v.is_null()),
            category: path.first().map(str::to_string),
            price_breaks_usd: normalize_price_breaks(fields.list(Field::Pricing)),
        };
        let parameters = serde_json::to_string(&parameters).map_err(kipipe_common::Error::from)?;

        Ok(ComponentDraft {
            manufacturer_part_number: mpn,
            manufacturer: fields.text(Field::Manufacturer),
            description,
            component_value: synthesized.component_value,
            datasheet_url: fields.text(Field::DatasheetUrl),
            product_status: fields.text(Field::ProductStatus),
            rohs_status: normalize_rohs_status(fields.text(Field::RohsStatus).as_deref()),
            package_case: lookup.get("Package / Case"),
            mounting_type: infer_mounting_type(&lookup, path),
            operating_temperature: operating_temperature(&lookup),
            category_id,
            internal_part_id: String::new(),
            parameters,
        })
    }
}

fn hit<'a>(source: &'a SupplierSource, raw: &Value) -> SupplierHit<'a> {
    let fields = map_fields(raw, &source.profile);
    let path = path_of(fields.get(Field::Category));
    SupplierHit {
        source,
        fields,
        path,
    }
}

/// Log a request-level failure at the level its kind calls for
pub fn log_failure(part_number: &str, error: &FetchError) {
    match error {
        FetchError::NotFound(_) => {
            tracing::warn!(part_number = %part_number, "Part not found on any supplier");
        }
        FetchError::CategoryUnresolved { labels, .. } => {
            tracing::warn!(
                part_number = %part_number,
                supplier_categories = ?labels,
                "No category mapping, queued for review"
            );
        }
        FetchError::CategoryDetailsMissing(category_id) => {
            tracing::error!(
                part_number = %part_number,
                category_id,
                "Mapped category has no taxonomy record"
            );
        }
        FetchError::Store(e) => {
            tracing::error!(part_number = %part_number, error = %e, "Store failure");
        }
    }
}
