//! Reference entity - A named group of cross-links from one product to others
//! ("fits with", "replaced by", ...).
//!
//! The product owning the reference is `product_id`; the linked products are
//! the reference's `reference_products` rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reference database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_references")]
pub struct Model {
    /// Unique identifier, 0 for references created by the payload
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Product owning the reference
    #[serde(default)]
    pub product_id: i32,
    /// Label of the reference group
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reference belongs to one owning product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// One reference links many products
    #[sea_orm(has_many = "super::reference_product::Entity")]
    ReferenceProducts,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::reference_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferenceProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
