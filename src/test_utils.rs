//! Shared test utilities.
//!
//! This module provides helpers for setting up an in-memory database and
//! inserting the rows a costing run reads, with sensible defaults.

use crate::{
    core::{CostingScope, DistributionMethod},
    entities::{
        category, cost_distribution_config, employee, employee_category,
        employee_cost_distribution_config, employee_salary_history, indirect_cost_record,
        monthly_production, monthly_sale, product, recipe, recipe_item, supply,
        supply_monthly_price,
    },
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Asserts two costs are equal within floating-point tolerance.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Builds a costing scope, panicking on a malformed month.
#[allow(clippy::unwrap_used)]
pub fn scope(company_id: i64, month: &str, method: DistributionMethod) -> CostingScope {
    CostingScope {
        company_id,
        month: month.parse().unwrap(),
        method,
    }
}

pub async fn create_category(
    db: &DatabaseConnection,
    company_id: i64,
    name: &str,
) -> Result<category::Model> {
    category::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active product.
///
/// # Defaults
/// * `unit_price`: twice the unit cost
/// * `sku`: None
/// * `stock_quantity`: 0
pub async fn create_product(
    db: &DatabaseConnection,
    company_id: i64,
    category_id: i64,
    name: &str,
    unit_cost: f64,
) -> Result<product::Model> {
    product::ActiveModel {
        company_id: Set(company_id),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        sku: Set(None),
        unit_price: Set(unit_cost * 2.0),
        unit_cost: Set(unit_cost),
        stock_quantity: Set(0.0),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn deactivate_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    product::ActiveModel {
        id: Set(product_id),
        is_active: Set(false),
        ..Default::default()
    }
    .update(db)
    .await?;
    Ok(())
}

pub async fn create_supply(
    db: &DatabaseConnection,
    company_id: i64,
    name: &str,
) -> Result<supply::Model> {
    supply::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        unit_measure: Set("kg".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn set_supply_price(
    db: &DatabaseConnection,
    company_id: i64,
    supply_id: i64,
    month: &str,
    price_per_unit: f64,
) -> Result<supply_monthly_price::Model> {
    supply_monthly_price::ActiveModel {
        company_id: Set(company_id),
        supply_id: Set(supply_id),
        month: Set(month.to_string()),
        price_per_unit: Set(price_per_unit),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active recipe named "Standard mix".
pub async fn create_recipe(
    db: &DatabaseConnection,
    company_id: i64,
    product_id: i64,
    output_quantity: f64,
) -> Result<recipe::Model> {
    recipe::ActiveModel {
        company_id: Set(company_id),
        product_id: Set(product_id),
        name: Set("Standard mix".to_string()),
        output_quantity: Set(output_quantity),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn add_recipe_item(
    db: &DatabaseConnection,
    recipe_id: i64,
    supply_id: i64,
    quantity: f64,
) -> Result<recipe_item::Model> {
    recipe_item::ActiveModel {
        recipe_id: Set(recipe_id),
        supply_id: Set(supply_id),
        quantity: Set(quantity),
        unit_measure: Set("kg".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn create_indirect_cost(
    db: &DatabaseConnection,
    company_id: i64,
    month: &str,
    cost_name: &str,
    amount: f64,
) -> Result<indirect_cost_record::Model> {
    indirect_cost_record::ActiveModel {
        company_id: Set(company_id),
        month: Set(month.to_string()),
        cost_name: Set(cost_name.to_string()),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active indirect cost distribution config.
pub async fn create_cost_distribution(
    db: &DatabaseConnection,
    company_id: i64,
    cost_name: &str,
    product_category_id: i64,
    percentage: f64,
) -> Result<cost_distribution_config::Model> {
    cost_distribution_config::ActiveModel {
        company_id: Set(company_id),
        cost_name: Set(cost_name.to_string()),
        product_category_id: Set(product_category_id),
        percentage: Set(percentage),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn create_employee_category(
    db: &DatabaseConnection,
    company_id: i64,
    name: &str,
) -> Result<employee_category::Model> {
    employee_category::ActiveModel {
        company_id: Set(company_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active employee with a single salary record.
pub async fn create_employee_with_salary(
    db: &DatabaseConnection,
    company_id: i64,
    employee_category_id: i64,
    month: &str,
    gross_salary: f64,
    payroll_taxes: f64,
) -> Result<employee::Model> {
    let employee = employee::ActiveModel {
        company_id: Set(company_id),
        employee_category_id: Set(employee_category_id),
        name: Set("Test employee".to_string()),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;

    employee_salary_history::ActiveModel {
        employee_id: Set(employee.id),
        month: Set(month.to_string()),
        gross_salary: Set(gross_salary),
        payroll_taxes: Set(payroll_taxes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(employee)
}

/// Creates an active employee cost distribution config.
pub async fn create_employee_distribution(
    db: &DatabaseConnection,
    company_id: i64,
    employee_category_id: i64,
    product_category_id: i64,
    percentage: f64,
) -> Result<employee_cost_distribution_config::Model> {
    employee_cost_distribution_config::ActiveModel {
        company_id: Set(company_id),
        employee_category_id: Set(employee_category_id),
        product_category_id: Set(product_category_id),
        percentage: Set(percentage),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn deactivate_employee_distribution(db: &DatabaseConnection, config_id: i64) -> Result<()> {
    employee_cost_distribution_config::ActiveModel {
        id: Set(config_id),
        is_active: Set(false),
        ..Default::default()
    }
    .update(db)
    .await?;
    Ok(())
}

pub async fn record_sale(
    db: &DatabaseConnection,
    company_id: i64,
    product_id: i64,
    month: &str,
    quantity_sold: f64,
    total_revenue: f64,
) -> Result<monthly_sale::Model> {
    monthly_sale::ActiveModel {
        company_id: Set(company_id),
        product_id: Set(product_id),
        month: Set(month.to_string()),
        quantity_sold: Set(quantity_sold),
        total_revenue: Set(total_revenue),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

pub async fn record_production(
    db: &DatabaseConnection,
    company_id: i64,
    product_id: i64,
    month: &str,
    quantity_produced: f64,
) -> Result<monthly_production::Model> {
    monthly_production::ActiveModel {
        company_id: Set(company_id),
        product_id: Set(product_id),
        month: Set(month.to_string()),
        quantity_produced: Set(quantity_produced),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
