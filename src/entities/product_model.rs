//! Model entity - Purchasable variants of a product (size, colour, edition).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Model database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "models")]
pub struct Model {
    /// Unique identifier, 0 while the model has not been stored yet
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Owning product
    #[serde(default)]
    pub product_id: i32,
    /// Variant name (e.g., "EU 42")
    pub name: String,
    /// Stock keeping unit, when the variant has its own
    #[serde(default)]
    pub sku: Option<String>,
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
