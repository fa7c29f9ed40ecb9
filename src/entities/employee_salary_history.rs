//! Employee salary history entity - Monthly salary records per employee.
//!
//! A costing run takes, for each active employee, the latest record at or before
//! the target month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Salary history database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_salary_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_id: i64,
    /// Month the salary became effective, as `YYYY-MM`
    pub month: String,
    pub gross_salary: f64,
    /// Employer payroll taxes and contributions on top of the gross salary
    pub payroll_taxes: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
