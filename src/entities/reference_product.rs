//! Reference product entity - Link row between a reference and a linked product.
//!
//! The row has no lifecycle of its own: it is created and removed as the
//! owning reference changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reference_products")]
pub struct Model {
    /// Unique identifier, 0 for links created by the payload
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Reference the link belongs to
    #[serde(default)]
    pub reference_id: i32,
    /// Linked product
    pub product_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link belongs to one reference
    #[sea_orm(
        belongs_to = "super::reference::Entity",
        from = "Column::ReferenceId",
        to = "super::reference::Column::Id"
    )]
    Reference,
    /// Each link points at one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::reference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reference.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
