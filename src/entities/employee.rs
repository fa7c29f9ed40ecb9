//! Employee entity - Payroll members whose cost is allocated to products.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub employee_category_id: i64,
    pub name: String,
    /// Inactive employees do not contribute to the payroll pool
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each employee belongs to one employee category
    #[sea_orm(
        belongs_to = "super::employee_category::Entity",
        from = "Column::EmployeeCategoryId",
        to = "super::employee_category::Column::Id"
    )]
    EmployeeCategory,
}

impl Related<super::employee_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
