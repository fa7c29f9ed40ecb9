//! Category entity - Product categories used to group products for cost allocation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning company (tenant)
    pub company_id: i64,
    /// Display name (e.g., "Bloques", "Viguetas")
    pub name: String,
}

/// Categories are referenced by products and distribution configs; they hold no foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
