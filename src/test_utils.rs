//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! creating catalog rows with sensible defaults.

use crate::{
    core::product::load_product_graph,
    entities::{
        category, product, product_category, product_model, product_ui, product_ui_file,
        reference, reference_product,
    },
    errors::{Error, Result},
    models::{
        CouponPayload, ProductDiscountPayload, ProductGraph, ProductPayload, ProductUiFilePayload,
        ProductUiGraph, ProductUiPayload, ReferenceGraph, ReferencePayload, StockPayload,
    },
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Set};
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a product with no children.
///
/// # Defaults
/// * price: 10.0
/// * no status, brand or department
pub async fn create_test_product(db: &DatabaseConnection, name: &str) -> Result<product::Model> {
    product::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(10.0),
        status_id: Set(None),
        brand_id: Set(None),
        department_id: Set(None),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a category that is not attached to anything.
pub async fn create_test_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    category::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Attaches a category to a product.
pub async fn link_category(
    db: &DatabaseConnection,
    product_id: i32,
    category_id: i32,
) -> Result<()> {
    crate::entities::ProductCategory::insert(product_category::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(category_id),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Creates a stored model for a product.
pub async fn create_test_model(
    db: &DatabaseConnection,
    product_id: i32,
    name: &str,
) -> Result<product_model::Model> {
    product_model::ActiveModel {
        id: NotSet,
        product_id: Set(product_id),
        name: Set(name.to_string()),
        sku: Set(None),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a reference owned by `owner_id` linking to each of `linked`, in order.
pub async fn create_test_reference(
    db: &DatabaseConnection,
    owner_id: i32,
    name: &str,
    linked: &[i32],
) -> Result<ReferenceGraph> {
    let reference = reference::ActiveModel {
        id: NotSet,
        product_id: Set(owner_id),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await?;

    let mut reference_products = Vec::with_capacity(linked.len());
    for &product_id in linked {
        let link = reference_product::ActiveModel {
            id: NotSet,
            reference_id: Set(reference.id),
            product_id: Set(product_id),
        }
        .insert(db)
        .await?;
        reference_products.push(link);
    }

    Ok(ReferenceGraph {
        reference,
        reference_products,
    })
}

/// Creates a layout for a product with one attachment per `(folder, filename)`,
/// sorted in the given order.
pub async fn create_test_ui(
    db: &DatabaseConnection,
    product_id: i32,
    files: &[(&str, &str)],
) -> Result<ProductUiGraph> {
    let product_ui = product_ui::ActiveModel {
        id: NotSet,
        product_id: Set(product_id),
        layout: Set("default".to_string()),
    }
    .insert(db)
    .await?;

    let mut product_ui_files = Vec::with_capacity(files.len());
    for (sort_order, (folder, filename)) in (0..).zip(files) {
        let file = product_ui_file::ActiveModel {
            id: NotSet,
            product_ui_id: Set(product_ui.id),
            folder: Set((*folder).to_string()),
            filename: Set((*filename).to_string()),
            sort_order: Set(sort_order),
        }
        .insert(db)
        .await?;
        product_ui_files.push(file);
    }

    Ok(ProductUiGraph {
        product_ui,
        product_ui_files,
    })
}

/// Loads a product graph that the test knows exists.
pub async fn load_graph(db: &DatabaseConnection, product_id: i32) -> Result<ProductGraph> {
    load_product_graph(db, product_id)
        .await?
        .ok_or_else(|| Error::not_found("Product", product_id))
}

/// Builds the payload a client would send back after reading `graph` unchanged.
pub fn payload_from(graph: &ProductGraph) -> ProductPayload {
    ProductPayload {
        status: graph.status.clone(),
        brand: graph.brand.clone(),
        department: graph.department.clone(),
        cart_items: Some(graph.cart_items.clone()),
        order_details: Some(graph.order_details.clone()),
        categories: Some(graph.categories.clone()),
        models: Some(graph.models.clone()),
        options: Some(graph.options.clone()),
        stock: Some(
            graph
                .stock
                .iter()
                .map(|s| StockPayload {
                    id: s.id,
                    product_id: s.product_id,
                    quantity: s.quantity,
                    last_order: s.last_order.into(),
                    ordered_last: s.ordered_last.into(),
                })
                .collect(),
        ),
        product_discounts: Some(
            graph
                .product_discounts
                .iter()
                .map(|d| ProductDiscountPayload {
                    id: d.id,
                    product_id: d.product_id,
                    percentage: d.percentage,
                    valid_from: d.valid_from.into(),
                    expires: d.expires.into(),
                })
                .collect(),
        ),
        coupons: Some(
            graph
                .coupons
                .iter()
                .map(|c| CouponPayload {
                    id: c.id,
                    product_id: c.product_id,
                    code: c.code.clone(),
                    amount: c.amount,
                    valid_from: c.valid_from.into(),
                    expires: c.expires.into(),
                })
                .collect(),
        ),
        references: Some(
            graph
                .references
                .iter()
                .map(|r| ReferencePayload {
                    reference: r.reference.clone(),
                    reference_products: Some(r.reference_products.clone()),
                })
                .collect(),
        ),
        reference_products: Some(graph.reference_products.clone()),
        product_ui: graph.product_ui.as_ref().map(|ui| ProductUiPayload {
            product_ui: ui.product_ui.clone(),
            product_ui_files: Some(
                ui.product_ui_files
                    .iter()
                    .cloned()
                    .map(|file| ProductUiFilePayload {
                        file,
                        content: None,
                    })
                    .collect(),
            ),
        }),
        ..ProductPayload::new(graph.product.clone())
    }
}
