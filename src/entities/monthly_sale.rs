//! Monthly sale entity - Units sold and revenue per product and month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly sales database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub product_id: i64,
    /// Month of the sales, as `YYYY-MM`
    pub month: String,
    pub quantity_sold: f64,
    pub total_revenue: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
