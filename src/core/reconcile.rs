//! Pure transformations between a submitted [`ProductPayload`] and the
//! [`ProductGraph`] that gets written.
//!
//! Nothing here touches the database or the file system; every function takes
//! values and returns new ones.

use crate::{
    entities::{category, coupon, product_discount, product_ui_file, reference_product, stock},
    models::{
        CouponPayload, ProductDiscountPayload, ProductGraph, ProductPayload, ProductUiGraph,
        ReferenceGraph, ReferencePayload, StockPayload,
    },
};
use std::collections::HashSet;

/// New file content for an attachment, written after the graph is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file: product_ui_file::Model,
    pub content: Vec<u8>,
}

/// Everything the update needs after reconciliation: the graph to persist and
/// the files to write once it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteSet {
    pub graph: ProductGraph,
    pub uploads: Vec<FileUpload>,
}

/// Drops the fields clients may not overwrite: status, brand, department, cart
/// items and order details are owned by other workflows.
#[must_use]
pub fn sanitize(payload: ProductPayload) -> ProductPayload {
    ProductPayload {
        status: None,
        brand: None,
        department: None,
        cart_items: None,
        order_details: None,
        ..payload
    }
}

/// Stock rows with both dates in UTC.
#[must_use]
pub fn normalize_stock(items: Vec<StockPayload>) -> Vec<stock::Model> {
    items.into_iter().map(StockPayload::into_model).collect()
}

/// Discounts with their validity window in UTC.
#[must_use]
pub fn normalize_discounts(items: Vec<ProductDiscountPayload>) -> Vec<product_discount::Model> {
    items
        .into_iter()
        .map(ProductDiscountPayload::into_model)
        .collect()
}

/// Coupons with their validity window in UTC.
#[must_use]
pub fn normalize_coupons(items: Vec<CouponPayload>) -> Vec<coupon::Model> {
    items.into_iter().map(CouponPayload::into_model).collect()
}

/// Categories from `incoming` that are not yet attached.
///
/// Existing memberships are never removed, so the result is only what has to
/// be added. Repeated IDs in `incoming` are kept once.
#[must_use]
pub fn new_categories(
    existing: &[category::Model],
    incoming: Vec<category::Model>,
) -> Vec<category::Model> {
    let mut seen: HashSet<i32> = existing.iter().map(|c| c.id).collect();
    incoming
        .into_iter()
        .filter(|c| c.id == 0 || seen.insert(c.id))
        .collect()
}

/// Entries that have not been stored yet (ID 0).
///
/// Stored rows are left out so the write never re-inserts them.
#[must_use]
pub fn unsaved_only<T>(items: Vec<T>, id: impl Fn(&T) -> i32) -> Vec<T> {
    items.into_iter().filter(|item| id(item) == 0).collect()
}

/// Links of the stored reference whose product is no longer listed in the
/// submitted version of that reference.
#[must_use]
pub fn stale_reference_products(
    stored: &ReferenceGraph,
    incoming: &ReferencePayload,
) -> Vec<reference_product::Model> {
    let kept: HashSet<i32> = incoming
        .reference_products
        .iter()
        .flatten()
        .map(|link| link.product_id)
        .collect();

    stored
        .reference_products
        .iter()
        .filter(|link| !kept.contains(&link.product_id))
        .cloned()
        .collect()
}

/// Turns a sanitized payload into the graph to persist plus the pending uploads.
///
/// `existing` is the stored aggregate; it decides which categories are new.
#[must_use]
pub fn into_write_set(payload: ProductPayload, existing: &ProductGraph) -> WriteSet {
    let mut uploads = Vec::new();
    let product_ui = payload.product_ui.map(|ui| ProductUiGraph {
        product_ui: ui.product_ui,
        product_ui_files: ui
            .product_ui_files
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                if let Some(content) = entry.content {
                    uploads.push(FileUpload {
                        file: entry.file.clone(),
                        content,
                    });
                }
                entry.file
            })
            .collect(),
    });

    let graph = ProductGraph {
        categories: new_categories(&existing.categories, payload.categories.unwrap_or_default()),
        models: unsaved_only(payload.models.unwrap_or_default(), |m| m.id),
        options: unsaved_only(payload.options.unwrap_or_default(), |o| o.id),
        stock: normalize_stock(payload.stock.unwrap_or_default()),
        product_discounts: normalize_discounts(payload.product_discounts.unwrap_or_default()),
        coupons: normalize_coupons(payload.coupons.unwrap_or_default()),
        references: payload
            .references
            .unwrap_or_default()
            .into_iter()
            .map(|r| ReferenceGraph {
                reference: r.reference,
                reference_products: r.reference_products.unwrap_or_default(),
            })
            .collect(),
        reference_products: payload.reference_products.unwrap_or_default(),
        product_ui,
        ..ProductGraph::new(payload.product)
    };

    WriteSet { graph, uploads }
}
