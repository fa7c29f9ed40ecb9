//! Product entity - Sellable items whose unit cost and price are calculated.
//!
//! Each product belongs to exactly one category. The stored `unit_cost` is the
//! fallback materials cost when no recipe exists; `unit_price` is the current list
//! price shown next to the calculated price.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning company (tenant)
    pub company_id: i64,
    /// Category used to group the product for allocation
    pub category_id: i64,
    /// Name of the product
    pub name: String,
    /// Optional stock-keeping code
    pub sku: Option<String>,
    /// Current sale price per unit
    pub unit_price: f64,
    /// Stored cost per unit, used when no recipe is available
    pub unit_cost: f64,
    /// Units currently in stock
    pub stock_quantity: f64,
    /// Inactive products are excluded from costing runs
    pub is_active: bool,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
