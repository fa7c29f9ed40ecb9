//! Supply monthly price entity - Time series of raw material prices.
//!
//! Prices are keyed by `(supply_id, month)`; a costing run uses the latest month
//! at or before its target month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly supply price database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supply_monthly_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub supply_id: i64,
    /// Month the price applies to, as `YYYY-MM`
    pub month: String,
    /// Price per unit of the supply's unit of measure
    pub price_per_unit: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price row belongs to one supply
    #[sea_orm(
        belongs_to = "super::supply::Entity",
        from = "Column::SupplyId",
        to = "super::supply::Column::Id"
    )]
    Supply,
}

impl Related<super::supply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supply.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
