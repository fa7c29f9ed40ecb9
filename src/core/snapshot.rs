//! Batch loading of everything a costing run reads.
//!
//! A run is scoped to one `(company, month, distribution method)` triple. All rows
//! are fetched up front in a fixed number of queries and indexed by id, so the
//! per-product computation that follows never touches the database.

use super::{
    allocation::PoolSet,
    employee, indirect,
    materials::MaterialsCatalog,
    month::ProductionMonth,
    volume::{DistributionMethod, VolumeSignal},
};
use crate::{
    entities::{
        Category, CostDistributionConfig, Employee, EmployeeCategory,
        EmployeeCostDistributionConfig, EmployeeSalaryHistory, IndirectCostRecord,
        MonthlyProduction, MonthlySale, Product, Recipe, RecipeItem, Supply, SupplyMonthlyPrice,
        category, cost_distribution_config, employee as employee_entity, employee_category,
        employee_cost_distribution_config, employee_salary_history, indirect_cost_record,
        monthly_production, monthly_sale, product, recipe, recipe_item, supply,
        supply_monthly_price,
    },
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

/// The request a costing run answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostingScope {
    pub company_id: i64,
    pub month: ProductionMonth,
    pub method: DistributionMethod,
}

/// Units sold and revenue of one product for the month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub quantity: f64,
    pub revenue: f64,
}

impl SalesSummary {
    /// Revenue per unit sold, when anything was sold.
    #[must_use]
    pub fn average_price(&self) -> Option<f64> {
        (self.quantity > 0.0).then(|| self.revenue / self.quantity)
    }
}

/// Read-only inputs of one costing run.
#[derive(Debug, Clone)]
pub struct CostingSnapshot {
    pub scope: CostingScope,
    /// Active products, ordered by name then id
    pub products: Vec<product::Model>,
    pub category_names: HashMap<i64, String>,
    pub materials: MaterialsCatalog,
    pub indirect: PoolSet,
    pub employee: PoolSet,
    pub volumes: VolumeSignal,
    pub sales: HashMap<i64, SalesSummary>,
}

impl CostingSnapshot {
    /// Loads the snapshot for `scope`.
    ///
    /// # Errors
    /// Returns an error if any query fails.
    #[instrument(skip(db), fields(company_id = scope.company_id, month = %scope.month, method = %scope.method))]
    pub async fn load(db: &DatabaseConnection, scope: CostingScope) -> Result<Self> {
        let company_id = scope.company_id;
        let month_key = scope.month.key();

        let products = Product::find()
            .filter(product::Column::CompanyId.eq(company_id))
            .filter(product::Column::IsActive.eq(true))
            .order_by_asc(product::Column::Name)
            .order_by_asc(product::Column::Id)
            .all(db)
            .await?;
        let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();

        let category_names = Category::find()
            .filter(category::Column::CompanyId.eq(company_id))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let materials = load_materials(db, company_id, &product_ids, scope.month).await?;

        let indirect_records = IndirectCostRecord::find()
            .filter(indirect_cost_record::Column::CompanyId.eq(company_id))
            .filter(indirect_cost_record::Column::Month.eq(month_key.as_str()))
            .order_by_asc(indirect_cost_record::Column::Id)
            .all(db)
            .await?;
        let indirect_configs = CostDistributionConfig::find()
            .filter(cost_distribution_config::Column::CompanyId.eq(company_id))
            .filter(cost_distribution_config::Column::IsActive.eq(true))
            .order_by_asc(cost_distribution_config::Column::Id)
            .all(db)
            .await?;
        let indirect = indirect::pool_set(&indirect_records, &indirect_configs);

        let employee = load_payroll(db, company_id, scope.month).await?;

        let sales_rows = MonthlySale::find()
            .filter(monthly_sale::Column::CompanyId.eq(company_id))
            .filter(monthly_sale::Column::Month.eq(month_key.as_str()))
            .order_by_asc(monthly_sale::Column::Id)
            .all(db)
            .await?;

        let mut sales: HashMap<i64, SalesSummary> = HashMap::new();
        for row in &sales_rows {
            let summary = sales.entry(row.product_id).or_default();
            summary.quantity += row.quantity_sold;
            summary.revenue += row.total_revenue;
        }

        let volumes = match scope.method {
            DistributionMethod::Sales => VolumeSignal::from_rows(
                scope.method,
                sales_rows.iter().map(|r| (r.product_id, r.quantity_sold)),
            ),
            DistributionMethod::Production => {
                let rows = MonthlyProduction::find()
                    .filter(monthly_production::Column::CompanyId.eq(company_id))
                    .filter(monthly_production::Column::Month.eq(month_key.as_str()))
                    .order_by_asc(monthly_production::Column::Id)
                    .all(db)
                    .await?;
                VolumeSignal::from_rows(
                    scope.method,
                    rows.iter().map(|r| (r.product_id, r.quantity_produced)),
                )
            }
        };

        info!(
            products = products.len(),
            indirect_pools = indirect.pools.len(),
            indirect_rules = indirect.rules.len(),
            employee_pools = employee.pools.len(),
            employee_rules = employee.rules.len(),
            has_volume_data = volumes.has_any_data(),
            "Costing snapshot loaded"
        );

        Ok(Self {
            scope,
            products,
            category_names,
            materials,
            indirect,
            employee,
            volumes,
            sales,
        })
    }
}

async fn load_materials(
    db: &DatabaseConnection,
    company_id: i64,
    product_ids: &[i64],
    month: ProductionMonth,
) -> Result<MaterialsCatalog> {
    if product_ids.is_empty() {
        return Ok(MaterialsCatalog::default());
    }

    let recipes: Vec<recipe::Model> = Recipe::find()
        .filter(recipe::Column::CompanyId.eq(company_id))
        .filter(recipe::Column::IsActive.eq(true))
        .filter(recipe::Column::ProductId.is_in(product_ids.iter().copied()))
        .order_by_asc(recipe::Column::Id)
        .all(db)
        .await?;
    if recipes.is_empty() {
        return Ok(MaterialsCatalog::default());
    }

    let items: Vec<recipe_item::Model> = RecipeItem::find()
        .filter(recipe_item::Column::RecipeId.is_in(recipes.iter().map(|r| r.id)))
        .order_by_asc(recipe_item::Column::Id)
        .all(db)
        .await?;

    let supply_ids: BTreeSet<i64> = items.iter().map(|i| i.supply_id).collect();
    let (supplies, prices): (Vec<supply::Model>, Vec<supply_monthly_price::Model>) =
        if supply_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let supplies = Supply::find()
                .filter(supply::Column::Id.is_in(supply_ids.iter().copied()))
                .all(db)
                .await?;
            let prices = SupplyMonthlyPrice::find()
                .filter(supply_monthly_price::Column::CompanyId.eq(company_id))
                .filter(supply_monthly_price::Column::SupplyId.is_in(supply_ids.iter().copied()))
                .filter(supply_monthly_price::Column::Month.lte(month.key()))
                .all(db)
                .await?;
            (supplies, prices)
        };

    Ok(MaterialsCatalog::new(recipes, items, supplies, prices, month))
}

async fn load_payroll(
    db: &DatabaseConnection,
    company_id: i64,
    month: ProductionMonth,
) -> Result<PoolSet> {
    let categories: Vec<employee_category::Model> = EmployeeCategory::find()
        .filter(employee_category::Column::CompanyId.eq(company_id))
        .all(db)
        .await?;
    let employees: Vec<employee_entity::Model> = Employee::find()
        .filter(employee_entity::Column::CompanyId.eq(company_id))
        .filter(employee_entity::Column::IsActive.eq(true))
        .order_by_asc(employee_entity::Column::Id)
        .all(db)
        .await?;

    let salaries: Vec<employee_salary_history::Model> = if employees.is_empty() {
        Vec::new()
    } else {
        EmployeeSalaryHistory::find()
            .filter(employee_salary_history::Column::EmployeeId.is_in(employees.iter().map(|e| e.id)))
            .filter(employee_salary_history::Column::Month.lte(month.key()))
            .all(db)
            .await?
    };

    let configs: Vec<employee_cost_distribution_config::Model> =
        EmployeeCostDistributionConfig::find()
            .filter(employee_cost_distribution_config::Column::CompanyId.eq(company_id))
            .filter(employee_cost_distribution_config::Column::IsActive.eq(true))
            .order_by_asc(employee_cost_distribution_config::Column::Id)
            .all(db)
            .await?;

    Ok(employee::pool_set(
        &categories,
        &employees,
        &salaries,
        &configs,
        month,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_average_price_requires_sales() {
        assert_eq!(SalesSummary::default().average_price(), None);
        let summary = SalesSummary {
            quantity: 4.0,
            revenue: 100.0,
        };
        assert_eq!(summary.average_price(), Some(25.0));
    }

    #[tokio::test]
    async fn test_load_scopes_to_company_and_active_products() -> Result<()> {
        let db = setup_test_db().await?;
        let bloques = create_category(&db, 1, "Bloques").await?;
        let other = create_category(&db, 2, "Otros").await?;
        create_product(&db, 1, bloques.id, "Bloque 20", 10.0).await?;
        let inactive = create_product(&db, 1, bloques.id, "Bloque viejo", 10.0).await?;
        deactivate_product(&db, inactive.id).await?;
        create_product(&db, 2, other.id, "Ajeno", 10.0).await?;

        let snapshot = CostingSnapshot::load(&db, scope(1, "2025-08", DistributionMethod::Sales)).await?;

        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.products[0].name, "Bloque 20");
        assert_eq!(snapshot.category_names.get(&bloques.id).unwrap(), "Bloques");
        assert!(!snapshot.category_names.contains_key(&other.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_picks_volume_source_by_method() -> Result<()> {
        let db = setup_test_db().await?;
        let cat = create_category(&db, 1, "Bloques").await?;
        let p = create_product(&db, 1, cat.id, "Bloque 20", 10.0).await?;
        record_sale(&db, 1, p.id, "2025-08", 12.0, 240.0).await?;
        record_sale(&db, 1, p.id, "2025-08", 3.0, 60.0).await?;
        record_sale(&db, 1, p.id, "2025-07", 100.0, 2000.0).await?;
        record_production(&db, 1, p.id, "2025-08", 40.0).await?;

        let by_sales = CostingSnapshot::load(&db, scope(1, "2025-08", DistributionMethod::Sales)).await?;
        assert_eq!(by_sales.volumes.volume_for(p.id), 15.0);
        assert_eq!(by_sales.volumes.data_source(), "monthly_sales");
        assert_eq!(by_sales.sales[&p.id].average_price(), Some(20.0));

        let by_production =
            CostingSnapshot::load(&db, scope(1, "2025-08", DistributionMethod::Production)).await?;
        assert_eq!(by_production.volumes.volume_for(p.id), 40.0);
        // Sales are still loaded for the average sale price
        assert_eq!(by_production.sales[&p.id].quantity, 15.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_builds_pools_for_month() -> Result<()> {
        let db = setup_test_db().await?;
        let cat = create_category(&db, 1, "Bloques").await?;
        create_indirect_cost(&db, 1, "2025-08", "Alquiler", 1000.0).await?;
        create_indirect_cost(&db, 1, "2025-07", "Alquiler", 5000.0).await?;
        create_cost_distribution(&db, 1, "Alquiler", cat.id, 100.0).await?;
        let operarios = create_employee_category(&db, 1, "Operarios").await?;
        create_employee_with_salary(&db, 1, operarios.id, "2025-06", 900.0, 100.0).await?;
        create_employee_distribution(&db, 1, operarios.id, cat.id, 100.0).await?;

        let snapshot = CostingSnapshot::load(&db, scope(1, "2025-08", DistributionMethod::Sales)).await?;

        assert_eq!(snapshot.indirect.total(), 1000.0);
        assert_eq!(snapshot.indirect.rules.len(), 1);
        assert_eq!(snapshot.employee.total(), 1000.0);
        assert_eq!(snapshot.employee.pools[0].label, "Operarios");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_skips_inactive_employee_configs() -> Result<()> {
        let db = setup_test_db().await?;
        let bloques = create_category(&db, 1, "Bloques").await?;
        let tejas = create_category(&db, 1, "Tejas").await?;
        let operarios = create_employee_category(&db, 1, "Operarios").await?;
        create_employee_with_salary(&db, 1, operarios.id, "2025-08", 1000.0, 0.0).await?;
        create_employee_distribution(&db, 1, operarios.id, bloques.id, 100.0).await?;
        let retired = create_employee_distribution(&db, 1, operarios.id, tejas.id, 50.0).await?;
        deactivate_employee_distribution(&db, retired.id).await?;

        let snapshot = CostingSnapshot::load(&db, scope(1, "2025-08", DistributionMethod::Sales)).await?;

        assert_eq!(snapshot.employee.rules.len(), 1);
        assert_eq!(snapshot.employee.rules[0].category_id, bloques.id);
        Ok(())
    }
}
