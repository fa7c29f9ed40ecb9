//! Materials costing from recipes (bills of materials).
//!
//! A product's materials cost per unit is the cost of one recipe batch divided by
//! the batch's output quantity. Each recipe item is priced with the latest supply
//! price at or before the costing month. Products without a usable recipe fall
//! back to their stored unit cost; the fallback is recorded as a warning.

use super::{month::ProductionMonth, warning::AllocationWarning};
use crate::entities::{product, recipe, recipe_item, supply, supply_monthly_price};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The recipe used to cost a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub output_quantity: f64,
    /// Cost of one batch (sum of line costs)
    pub batch_cost: f64,
}

/// One priced recipe line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeItemCost {
    pub supply_id: i64,
    pub supply_name: Option<String>,
    pub quantity: f64,
    pub unit_measure: String,
    /// 0 when no price was found
    pub unit_price: f64,
    pub line_cost: f64,
    /// Month of the price used, if any
    pub price_month: Option<String>,
}

/// Materials cost of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsCost {
    pub per_unit: f64,
    pub recipe: Option<RecipeSummary>,
    pub items: Vec<RecipeItemCost>,
    #[serde(skip)]
    pub warnings: Vec<AllocationWarning>,
}

impl MaterialsCost {
    fn stored(product: &product::Model, warning: AllocationWarning) -> Self {
        Self {
            per_unit: product.unit_cost,
            recipe: None,
            items: Vec::new(),
            warnings: vec![warning],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SupplyPrice {
    month: String,
    price_per_unit: f64,
}

#[derive(Debug, Clone)]
struct RecipeEntry {
    recipe: recipe::Model,
    items: Vec<recipe_item::Model>,
}

/// Recipes, supplies and resolved prices for one costing run.
#[derive(Debug, Clone, Default)]
pub struct MaterialsCatalog {
    recipes: HashMap<i64, RecipeEntry>,
    supplies: HashMap<i64, supply::Model>,
    prices: HashMap<i64, SupplyPrice>,
}

impl MaterialsCatalog {
    /// Indexes batch-loaded rows by product and supply.
    ///
    /// Only active recipes are kept, the lowest id winning when a product has
    /// several. For each supply the price row with the latest month at or before
    /// `month` is kept; rows after `month` are ignored.
    #[must_use]
    pub fn new(
        recipes: Vec<recipe::Model>,
        items: Vec<recipe_item::Model>,
        supplies: Vec<supply::Model>,
        prices: Vec<supply_monthly_price::Model>,
        month: ProductionMonth,
    ) -> Self {
        let mut items_by_recipe: HashMap<i64, Vec<recipe_item::Model>> = HashMap::new();
        for item in items {
            items_by_recipe.entry(item.recipe_id).or_default().push(item);
        }
        for recipe_items in items_by_recipe.values_mut() {
            recipe_items.sort_by_key(|item| item.id);
        }

        let mut by_product: HashMap<i64, RecipeEntry> = HashMap::new();
        for recipe in recipes.into_iter().filter(|r| r.is_active) {
            let replace = by_product
                .get(&recipe.product_id)
                .is_none_or(|existing| recipe.id < existing.recipe.id);
            if replace {
                let items = items_by_recipe.get(&recipe.id).cloned().unwrap_or_default();
                by_product.insert(recipe.product_id, RecipeEntry { recipe, items });
            }
        }

        let month_key = month.key();
        let mut latest: HashMap<i64, (String, i64, f64)> = HashMap::new();
        for row in prices.into_iter().filter(|p| p.month <= month_key) {
            let newer = latest.get(&row.supply_id).is_none_or(|(m, id, _)| {
                (row.month.as_str(), row.id) > (m.as_str(), *id)
            });
            if newer {
                latest.insert(row.supply_id, (row.month, row.id, row.price_per_unit));
            }
        }

        Self {
            recipes: by_product,
            supplies: supplies.into_iter().map(|s| (s.id, s)).collect(),
            prices: latest
                .into_iter()
                .map(|(supply_id, (month, _, price_per_unit))| {
                    (supply_id, SupplyPrice { month, price_per_unit })
                })
                .collect(),
        }
    }

    /// Materials cost per unit of `product`.
    #[must_use]
    pub fn cost_for(&self, product: &product::Model) -> MaterialsCost {
        let Some(entry) = self.recipes.get(&product.id) else {
            debug!(product_id = product.id, "No active recipe, using stored unit cost");
            return MaterialsCost::stored(product, AllocationWarning::NoRecipe);
        };

        let recipe = &entry.recipe;
        let usable_yield = recipe.output_quantity.is_finite() && recipe.output_quantity > 0.0;
        if !usable_yield {
            warn!(
                product_id = product.id,
                recipe_id = recipe.id,
                output_quantity = recipe.output_quantity,
                "Recipe output quantity is not positive, using stored unit cost"
            );
            return MaterialsCost::stored(
                product,
                AllocationWarning::InvalidRecipeYield {
                    recipe_id: recipe.id,
                    output_quantity: recipe.output_quantity,
                },
            );
        }

        let mut warnings = Vec::new();
        let items: Vec<RecipeItemCost> = entry
            .items
            .iter()
            .map(|item| {
                let supply_name = self.supplies.get(&item.supply_id).map(|s| s.name.clone());
                let price = self.prices.get(&item.supply_id);
                if price.is_none() {
                    debug!(
                        product_id = product.id,
                        supply_id = item.supply_id,
                        "No supply price at or before month, item contributes 0"
                    );
                    warnings.push(AllocationWarning::MissingSupplyPrice {
                        supply_id: item.supply_id,
                        supply_name: supply_name.clone(),
                    });
                }
                let unit_price = price.map_or(0.0, |p| p.price_per_unit);

                RecipeItemCost {
                    supply_id: item.supply_id,
                    supply_name,
                    quantity: item.quantity,
                    unit_measure: item.unit_measure.clone(),
                    unit_price,
                    line_cost: item.quantity * unit_price,
                    price_month: price.map(|p| p.month.clone()),
                }
            })
            .collect();

        let batch_cost: f64 = items.iter().map(|i| i.line_cost).sum();

        MaterialsCost {
            per_unit: batch_cost / recipe.output_quantity,
            recipe: Some(RecipeSummary {
                id: recipe.id,
                name: recipe.name.clone(),
                output_quantity: recipe.output_quantity,
                batch_cost,
            }),
            items,
            warnings,
        }
    }
}
