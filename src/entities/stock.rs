//! Stock entity - Warehouse quantities for a product together with reorder dates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Owning product
    #[serde(default)]
    pub product_id: i32,
    /// Units on hand
    pub quantity: i32,
    /// When the last customer order drew from this stock
    pub last_order: DateTimeUtc,
    /// When stock was last reordered from the supplier
    pub ordered_last: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one product
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
