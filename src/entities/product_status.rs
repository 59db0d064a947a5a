//! Product status entity - Workflow states a product moves through (draft, live, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lookup row referenced from `products`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_statuses")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable name
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
