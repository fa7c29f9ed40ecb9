//! Cost aggregation and suggested pricing.
//!
//! For every product the three cost components are combined into a total unit
//! cost, and the suggested price applies a fixed 30% margin on top. Each report
//! is built once from the components' outputs; nothing is patched in afterwards.

use super::{
    allocation::{AllocationTarget, DistributionInfo, PoolContribution, ProductAllocation},
    employee, indirect,
    materials::{MaterialsCost, RecipeItemCost},
    snapshot::{CostingScope, CostingSnapshot, SalesSummary},
    warning::AllocationWarning,
};
use crate::{entities::product, errors::Result};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Suggested price = total unit cost × this multiplier.
pub const PRICE_MARGIN_MULTIPLIER: f64 = 1.3;

/// Materials, indirect, employee and total cost at one level of aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub materials: f64,
    pub indirect_costs: f64,
    pub employee_costs: f64,
    pub total: f64,
}

impl CostBreakdown {
    fn new(materials: f64, indirect_costs: f64, employee_costs: f64) -> Self {
        Self {
            materials,
            indirect_costs,
            employee_costs,
            total: materials + indirect_costs + employee_costs,
        }
    }
}

/// Whether a product's figures were computed from complete data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputationStatus {
    Computed,
    /// At least one component fell back to a default; see `warnings`
    Fallback,
}

/// Full cost and price report for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCostReport {
    pub id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub category_id: i64,
    pub category_name: Option<String>,
    /// Stored list price
    pub current_price: f64,
    /// Stored unit cost
    pub current_cost: f64,
    pub stock_quantity: f64,
    /// Revenue per unit sold this month, when there were sales
    pub average_sale_price: Option<f64>,
    /// Total unit cost
    pub calculated_cost: f64,
    /// `calculated_cost × 1.3`
    pub calculated_price: f64,
    /// Margin of the current price over the calculated cost, in percent
    pub current_margin_percentage: Option<f64>,
    /// Month volume used for allocation
    pub volume: f64,
    /// Totals for the month's volume
    pub cost_breakdown: CostBreakdown,
    pub cost_breakdown_per_unit: CostBreakdown,
    pub recipe_id: Option<i64>,
    pub recipe_name: Option<String>,
    pub recipe_output_quantity: Option<f64>,
    pub recipe_details: Vec<RecipeItemCost>,
    pub indirect_costs_breakdown: Vec<PoolContribution>,
    pub employee_costs_breakdown: Vec<PoolContribution>,
    pub indirect_distribution: Option<DistributionInfo>,
    pub employee_distribution: Option<DistributionInfo>,
    pub status: ComputationStatus,
    pub warnings: Vec<AllocationWarning>,
}

impl ProductCostReport {
    /// Composes the report from the outputs of the three cost components.
    ///
    /// A total that is not a finite number is replaced by the stored unit cost,
    /// with no allocated costs.
    #[must_use]
    pub fn compose(
        product: &product::Model,
        category_name: Option<String>,
        volume: f64,
        sales: Option<SalesSummary>,
        materials: MaterialsCost,
        indirect: ProductAllocation,
        employee: ProductAllocation,
    ) -> Self {
        let mut warnings = materials.warnings;
        warnings.extend(indirect.warnings);
        warnings.extend(employee.warnings);

        let mut per_unit = CostBreakdown::new(materials.per_unit, indirect.per_unit, employee.per_unit);
        let mut aggregate = CostBreakdown::new(
            materials.per_unit * volume,
            indirect.total_assigned,
            employee.total_assigned,
        );

        if !per_unit.total.is_finite() || !aggregate.total.is_finite() {
            warn!(product_id = product.id, "Computed cost is not finite, using stored cost");
            warnings.push(AllocationWarning::NonFiniteCost);
            per_unit = CostBreakdown::new(product.unit_cost, 0.0, 0.0);
            aggregate = CostBreakdown::new(product.unit_cost * volume, 0.0, 0.0);
        }

        let calculated_cost = per_unit.total;
        let current_margin_percentage = (product.unit_price > 0.0)
            .then(|| (product.unit_price - calculated_cost) / product.unit_price * 100.0);
        let status = if warnings.is_empty() {
            ComputationStatus::Computed
        } else {
            ComputationStatus::Fallback
        };
        let recipe = materials.recipe;

        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            category_id: product.category_id,
            category_name,
            current_price: product.unit_price,
            current_cost: product.unit_cost,
            stock_quantity: product.stock_quantity,
            average_sale_price: sales.and_then(|s| s.average_price()),
            calculated_cost,
            calculated_price: suggested_price(calculated_cost),
            current_margin_percentage,
            volume,
            cost_breakdown: aggregate,
            cost_breakdown_per_unit: per_unit,
            recipe_id: recipe.as_ref().map(|r| r.id),
            recipe_name: recipe.as_ref().map(|r| r.name.clone()),
            recipe_output_quantity: recipe.as_ref().map(|r| r.output_quantity),
            recipe_details: materials.items,
            indirect_costs_breakdown: indirect.breakdown,
            employee_costs_breakdown: employee.breakdown,
            indirect_distribution: indirect.distribution,
            employee_distribution: employee.distribution,
            status,
            warnings,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.status == ComputationStatus::Fallback
    }

    /// The report when it was computed from complete data, otherwise the
    /// warnings explaining what was defaulted.
    ///
    /// # Errors
    /// Returns the warnings when any component fell back.
    pub fn checked(&self) -> std::result::Result<&Self, &[AllocationWarning]> {
        if self.warnings.is_empty() {
            Ok(self)
        } else {
            Err(&self.warnings)
        }
    }
}

/// Summary counts of a costing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    pub company_id: i64,
    pub production_month: String,
    pub distribution_method: String,
    pub data_source: String,
    pub has_volume_data: bool,
    pub total_products: usize,
    pub products_with_recipe: usize,
    pub products_without_recipe: usize,
    pub zero_cost_products: usize,
    pub fallback_products: usize,
    pub indirect_pool_total: f64,
    pub indirect_distributed_total: f64,
    pub employee_pool_total: f64,
    pub employee_distributed_total: f64,
}

/// Response body of the pricing calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    #[serde(rename = "productPrices")]
    pub product_prices: Vec<ProductCostReport>,
    pub debug_info: DebugInfo,
}

/// Suggested sale price for a total unit cost.
#[must_use]
pub fn suggested_price(total_unit_cost: f64) -> f64 {
    total_unit_cost * PRICE_MARGIN_MULTIPLIER
}

/// Costs every product of the snapshot.
#[must_use]
pub fn build_report(snapshot: &CostingSnapshot) -> PriceReport {
    let targets: Vec<AllocationTarget> = snapshot
        .products
        .iter()
        .map(|p| AllocationTarget {
            product_id: p.id,
            category_id: p.category_id,
        })
        .collect();

    let indirect_allocation = indirect::allocate(&snapshot.indirect, &targets, &snapshot.volumes);
    let employee_allocation = employee::allocate(&snapshot.employee, &targets, &snapshot.volumes);

    let product_prices: Vec<ProductCostReport> = snapshot
        .products
        .iter()
        .map(|product| {
            ProductCostReport::compose(
                product,
                snapshot.category_names.get(&product.category_id).cloned(),
                snapshot.volumes.volume_for(product.id),
                snapshot.sales.get(&product.id).copied(),
                snapshot.materials.cost_for(product),
                indirect_allocation.for_product(product.id),
                employee_allocation.for_product(product.id),
            )
        })
        .collect();

    let products_with_recipe = product_prices.iter().filter(|r| r.recipe_id.is_some()).count();
    let scope = snapshot.scope;

    let debug_info = DebugInfo {
        company_id: scope.company_id,
        production_month: scope.month.key(),
        distribution_method: scope.method.to_string(),
        data_source: scope.method.data_source().to_string(),
        has_volume_data: snapshot.volumes.has_any_data(),
        total_products: product_prices.len(),
        products_with_recipe,
        products_without_recipe: product_prices.len() - products_with_recipe,
        zero_cost_products: product_prices
            .iter()
            .filter(|r| r.calculated_cost.abs() < f64::EPSILON)
            .count(),
        fallback_products: product_prices.iter().filter(|r| r.is_fallback()).count(),
        indirect_pool_total: indirect_allocation.pool_total,
        indirect_distributed_total: indirect_allocation.distributed_total,
        employee_pool_total: employee_allocation.pool_total,
        employee_distributed_total: employee_allocation.distributed_total,
    };

    info!(
        total_products = debug_info.total_products,
        products_with_recipe = debug_info.products_with_recipe,
        zero_cost_products = debug_info.zero_cost_products,
        fallback_products = debug_info.fallback_products,
        "Price report built"
    );

    PriceReport {
        product_prices,
        debug_info,
    }
}

/// Loads the snapshot for `scope` and costs every product in it.
///
/// # Errors
/// Returns an error only when the snapshot cannot be loaded; missing data inside
/// the snapshot is reported per product as warnings.
#[instrument(skip(db))]
pub async fn calculate_product_prices(
    db: &DatabaseConnection,
    scope: CostingScope,
) -> Result<PriceReport> {
    let snapshot = CostingSnapshot::load(db, scope).await?;
    Ok(build_report(&snapshot))
}
