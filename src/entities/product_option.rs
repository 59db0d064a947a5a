//! Option entity - Free-form add-ons offered with a product (gift wrap, engraving).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Option database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "options")]
pub struct Model {
    /// Unique identifier, 0 while the option has not been stored yet
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Owning product
    #[serde(default)]
    pub product_id: i32,
    /// Option name
    pub name: String,
    /// Surcharge applied when the option is chosen
    #[serde(default)]
    pub surcharge: f64,
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
