//! Recipe entity - Bill of materials for a product.
//!
//! A recipe yields `output_quantity` units of its product from the supplies listed
//! in its recipe items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe (bill of materials) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    /// Product this recipe produces
    pub product_id: i64,
    pub name: String,
    /// Units of product yielded by one batch of the recipe
    pub output_quantity: f64,
    /// Only active recipes are used for costing
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each recipe belongs to one product
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
