//! Product discount entity - Percentage reductions with a validity window.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_discounts")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Discounted product
    #[serde(default)]
    pub product_id: i32,
    /// Reduction in percent (0-100)
    pub percentage: f64,
    /// First instant the discount applies
    pub valid_from: DateTimeUtc,
    /// Instant the discount stops applying
    pub expires: DateTimeUtc,
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
