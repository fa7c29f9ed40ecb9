//! Employee cost distribution config entity - Sends a share of an employee
//! category's payroll to a product category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee cost distribution config database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_cost_distribution_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub employee_category_id: i64,
    pub product_category_id: i64,
    /// Share of the employee category's payroll sent to the product category, 0-100
    pub percentage: f64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee_category::Entity",
        from = "Column::EmployeeCategoryId",
        to = "super::employee_category::Column::Id"
    )]
    EmployeeCategory,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::ProductCategoryId",
        to = "super::category::Column::Id"
    )]
    ProductCategory,
}

impl Related<super::employee_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeCategory.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
