//! Product UI file entity - Metadata of a file attached to a product layout.
//!
//! Only the location is stored here. The bytes live under the web root at
//! `folder/filename`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attachment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_ui_files")]
pub struct Model {
    /// Unique identifier of the attachment
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    /// Layout the file is attached to
    #[serde(default)]
    pub product_ui_id: i32,
    /// Folder relative to the web root
    pub folder: String,
    /// File name inside `folder`
    pub filename: String,
    /// Position of the file within the layout
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each file belongs to one layout
    #[sea_orm(
        belongs_to = "super::product_ui::Entity",
        from = "Column::ProductUiId",
        to = "super::product_ui::Column::Id"
    )]
    ProductUi,
}

impl Related<super::product_ui::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUi.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
