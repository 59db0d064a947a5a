//! Coupon entity - Redeemable codes bound to a product, valid for a time window.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coupon database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Product the coupon applies to
    #[serde(default)]
    pub product_id: i32,
    /// Code the customer enters at checkout
    pub code: String,
    /// Fixed amount taken off the price
    pub amount: f64,
    /// First instant the coupon can be redeemed
    pub valid_from: DateTimeUtc,
    /// Instant the coupon stops being accepted
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
