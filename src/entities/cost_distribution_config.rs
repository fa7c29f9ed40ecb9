//! Cost distribution config entity - Sends a share of a named indirect cost to a category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Indirect cost distribution config database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_distribution_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    /// Matches `indirect_cost_records.cost_name`
    pub cost_name: String,
    /// Category receiving the share
    pub product_category_id: i64,
    /// Share of the cost sent to the category, 0-100
    pub percentage: f64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::ProductCategoryId",
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
