//! Database configuration module.
//!
//! This module handles `SQLite` connection setup and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    Brand, CartItem, Category, Coupon, Department, Models, OrderDetail, Options, Product,
    ProductCategory, ProductDiscount, ProductStatus, ProductUi, ProductUiFile, Reference,
    ReferenceProduct, Stock,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

/// Fallback used when neither the config file nor the environment names a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/product_admin.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates a table for `entity` unless it already exists.
async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every catalog table, parents before children.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, ProductStatus).await?;
    create_table(db, &schema, Brand).await?;
    create_table(db, &schema, Department).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, ProductCategory).await?;
    create_table(db, &schema, Models).await?;
    create_table(db, &schema, Options).await?;
    create_table(db, &schema, Stock).await?;
    create_table(db, &schema, ProductDiscount).await?;
    create_table(db, &schema, Coupon).await?;
    create_table(db, &schema, Reference).await?;
    create_table(db, &schema, ReferenceProduct).await?;
    create_table(db, &schema, ProductUi).await?;
    create_table(db, &schema, ProductUiFile).await?;
    create_table(db, &schema, CartItem).await?;
    create_table(db, &schema, OrderDetail).await?;

    Ok(())
}
