//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the tables a costing run reads.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod cost_distribution_config;
pub mod employee;
pub mod employee_category;
pub mod employee_cost_distribution_config;
pub mod employee_salary_history;
pub mod indirect_cost_record;
pub mod monthly_production;
pub mod monthly_sale;
pub mod product;
pub mod recipe;
pub mod recipe_item;
pub mod supply;
pub mod supply_monthly_price;

// Re-export specific types to avoid conflicts
pub use category::{Entity as Category, Model as CategoryModel};
pub use cost_distribution_config::{
    Entity as CostDistributionConfig, Model as CostDistributionConfigModel,
};
pub use employee::{Entity as Employee, Model as EmployeeModel};
pub use employee_category::{Entity as EmployeeCategory, Model as EmployeeCategoryModel};
pub use employee_cost_distribution_config::{
    Entity as EmployeeCostDistributionConfig, Model as EmployeeCostDistributionConfigModel,
};
pub use employee_salary_history::{
    Entity as EmployeeSalaryHistory, Model as EmployeeSalaryHistoryModel,
};
pub use indirect_cost_record::{Entity as IndirectCostRecord, Model as IndirectCostRecordModel};
pub use monthly_production::{Entity as MonthlyProduction, Model as MonthlyProductionModel};
pub use monthly_sale::{Entity as MonthlySale, Model as MonthlySaleModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use recipe::{Entity as Recipe, Model as RecipeModel};
pub use recipe_item::{Entity as RecipeItem, Model as RecipeItemModel};
pub use supply::{Entity as Supply, Model as SupplyModel};
pub use supply_monthly_price::{Entity as SupplyMonthlyPrice, Model as SupplyMonthlyPriceModel};
