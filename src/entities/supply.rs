//! Supply entity - Raw materials consumed by recipes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supply (raw material) database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    /// Material name (e.g., "Cemento", "Arena")
    pub name: String,
    /// Unit in which prices are quoted (e.g., "kg", "m3")
    pub unit_measure: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
