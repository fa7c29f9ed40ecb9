//! Database configuration module.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is idempotent (`IF NOT EXISTS`),
//! which lets the binary call it on every start.

use crate::entities::{
    Category, CostDistributionConfig, Employee, EmployeeCategory, EmployeeCostDistributionConfig,
    EmployeeSalaryHistory, IndirectCostRecord, MonthlyProduction, MonthlySale, Product, Recipe,
    RecipeItem, Supply, SupplyMonthlyPrice,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/costing.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection using `DATABASE_URL`, falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!(url = %database_url, "Connecting to database");

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every table the costing engine reads, skipping ones that already exist.
///
/// Parents are created before children so foreign keys resolve on backends that
/// check them at creation time.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, Supply).await?;
    create_table(db, &schema, SupplyMonthlyPrice).await?;
    create_table(db, &schema, Recipe).await?;
    create_table(db, &schema, RecipeItem).await?;
    create_table(db, &schema, IndirectCostRecord).await?;
    create_table(db, &schema, CostDistributionConfig).await?;
    create_table(db, &schema, EmployeeCategory).await?;
    create_table(db, &schema, Employee).await?;
    create_table(db, &schema, EmployeeSalaryHistory).await?;
    create_table(db, &schema, EmployeeCostDistributionConfig).await?;
    create_table(db, &schema, MonthlySale).await?;
    create_table(db, &schema, MonthlyProduction).await?;

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
