//! Product UI entity - Storefront layout for a product page.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product UI database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_uis")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Product the layout belongs to
    #[serde(default)]
    pub product_id: i32,
    /// Serialized layout description consumed by the storefront
    #[sea_orm(column_type = "Text")]
    #[serde(default)]
    pub layout: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each layout belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// One layout has many attached files
    #[sea_orm(has_many = "super::product_ui_file::Entity")]
    ProductUiFiles,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::product_ui_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUiFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
