//! Product entity - The aggregate root of the catalog.
//!
//! A product carries its own scalar data plus foreign keys to server-owned
//! lookup tables (status, brand, department). Everything else the product owns
//! (stock, models, options, discounts, coupons, references, UI) lives in child
//! tables pointing back here through `product_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name (e.g., "Trail Runner 2")
    pub name: String,
    /// Optional long description shown on the product page
    #[serde(default)]
    pub description: Option<String>,
    /// List price
    pub price: f64,
    /// Workflow status, managed by the status workflow
    #[serde(default)]
    pub status_id: Option<i32>,
    /// Owning brand
    #[serde(default)]
    pub brand_id: Option<i32>,
    /// Owning department
    #[serde(default)]
    pub department_id: Option<i32>,
}

/// Defines relationships between Product and its owned children
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many stock rows
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
    /// One product has many models
    #[sea_orm(has_many = "super::product_model::Entity")]
    Models,
    /// One product has many options
    #[sea_orm(has_many = "super::product_option::Entity")]
    Options,
    /// One product has many discounts
    #[sea_orm(has_many = "super::product_discount::Entity")]
    ProductDiscounts,
    /// One product has many coupons
    #[sea_orm(has_many = "super::coupon::Entity")]
    Coupons,
    /// One product owns many references
    #[sea_orm(has_many = "super::reference::Entity")]
    References,
    /// One product has at most one UI layout
    #[sea_orm(has_one = "super::product_ui::Entity")]
    ProductUi,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::product_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Models.def()
    }
}

impl Related<super::product_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl Related<super::product_discount::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductDiscounts.def()
    }
}

impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupons.def()
    }
}

impl Related<super::reference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::References.def()
    }
}

impl Related<super::product_ui::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUi.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
