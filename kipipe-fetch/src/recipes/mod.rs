//! Category-specific description and value synthesis
//!
//! A [`RecipeBook`] is an ordered list of immutable [`Recipe`] rules. The
//! first rule whose trigger accepts the category path is the only one used;
//! selection looks at nothing but the path, so the same path always picks
//! the same rule whichever supplier produced it.

pub mod standard;
pub mod units;

use crate::error::RecipeError;
use crate::mapping::{Field, FlatFields};
use crate::types::CategoryPath;
use crate::value::non_empty_text;
use serde_json::Value;

/// Supplier parameter "no data" marker
const NO_DATA: &str = "-";

/// Parameter name keys, Digi-Key then Mouser
const KEY_NAMES: [&str; 2] = ["ParameterText", "AttributeName"];
/// Parameter value keys, Digi-Key then Mouser
const VALUE_NAMES: [&str; 2] = ["ValueText", "AttributeValue"];

/// Lookup over a component's flat `{key, value}` parameter list
#[derive(Debug, Clone, Copy)]
pub struct ParamLookup<'a> {
    params: &'a [Value],
}

impl<'a> ParamLookup<'a> {
    pub fn new(params: &'a [Value]) -> Self {
        Self { params }
    }

    /// First usable value whose key is any of `names`
    ///
    /// Entries carrying the no-data marker or no value are skipped.
    pub fn find(&self, names: &[&str]) -> Option<String> {
        self.params.iter().find_map(|param| {
            let key = first_text(param, &KEY_NAMES)?;
            if !names.contains(&key.as_str()) {
                return None;
            }
            first_text(param, &VALUE_NAMES).filter(|v| v.trim() != NO_DATA)
        })
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.find(&[name])
    }
}

fn first_text(param: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| non_empty_text(param.get(*k)))
}

pub type Trigger = fn(&CategoryPath) -> bool;
pub type DescriptionPrefix = fn(&CategoryPath) -> String;
pub type DescriptionParams = fn(&CategoryPath) -> &'static [&'static str];
pub type ValueGenerator = fn(&ParamLookup<'_>, &CategoryPath) -> Result<String, RecipeError>;

/// One formatting rule
#[derive(Clone, Copy)]
pub struct Recipe {
    pub name: &'static str,
    pub trigger: Trigger,
    pub description_prefix: DescriptionPrefix,
    pub description_params: DescriptionParams,
    pub value_generator: ValueGenerator,
}

impl std::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recipe").field("name", &self.name).finish()
    }
}

/// Output of [`RecipeBook::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub description: String,
    pub component_value: String,
    /// Name of the recipe used, `None` on the no-match fallback
    pub recipe: Option<&'static str>,
}

/// Ordered recipe table, built once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// The production table
    pub fn standard() -> Self {
        Self::new(standard::recipes())
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// First recipe whose trigger accepts `path`
    pub fn select(&self, path: &CategoryPath) -> Option<&Recipe> {
        self.recipes.iter().find(|r| (r.trigger)(path))
    }

    /// Build description and component value for a mapped supplier record
    ///
    /// `manufacturer_part_number` is the fallback value whenever the
    /// selected generator fails or yields nothing, and when no recipe
    /// matches at all.
    pub fn apply(
        &self,
        fields: &FlatFields,
        path: &CategoryPath,
        manufacturer_part_number: &str,
    ) -> Synthesized {
        let Some(recipe) = self.select(path) else {
            return Synthesized {
                description: fields.text(Field::Description).unwrap_or_default(),
                component_value: manufacturer_part_number.to_string(),
                recipe: None,
            };
        };

        let lookup = ParamLookup::new(fields.list(Field::Parameters));

        let description = std::iter::once(Some((recipe.description_prefix)(path)))
            .chain((recipe.description_params)(path).iter().map(|name| lookup.get(name)))
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let component_value = match (recipe.value_generator)(&lookup, path) {
            Ok(value) if !value.trim().is_empty() => value,
            Ok(_) => {
                tracing::debug!(
                    recipe = recipe.name,
                    part_number = %manufacturer_part_number,
                    "Recipe produced empty value, using part number"
                );
                manufacturer_part_number.to_string()
            }
            Err(e) => {
                tracing::debug!(
                    recipe = recipe.name,
                    part_number = %manufacturer_part_number,
                    error = %e,
                    "Recipe value generation failed, using part number"
                );
                manufacturer_part_number.to_string()
            }
        };

        Synthesized {
            description,
            component_value,
            recipe: Some(recipe.name),
        }
    }
}
