//! Indirect cost record entity - Shared monthly overhead (rent, energy, ...).
//!
//! Records are named by `cost_name`; distribution configs refer to that name to
//! send a percentage of the amount to a product category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Indirect cost monthly record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "indirect_cost_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    /// Month the cost was incurred, as `YYYY-MM`
    pub month: String,
    /// Name of the cost item (e.g., "Alquiler", "Energía")
    pub cost_name: String,
    pub amount: f64,
}

/// Indirect cost records have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
