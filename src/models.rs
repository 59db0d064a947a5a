//! Aggregate and payload types for the product catalog.
//!
//! [`ProductGraph`] is the product aggregate as it is stored: the product row
//! plus every child collection, loaded or written as one unit. [`ProductPayload`]
//! is what a client submits to replace it. The two differ where the client is
//! allowed to be vaguer than the store: collections may be missing, timestamps
//! may come without a zone, and attachments may carry file content.

use crate::entities::{
    brand, cart_item, category, coupon, department, order_detail, product, product_discount,
    product_model, product_option, product_status, product_ui, product_ui_file, reference,
    reference_product, stock,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp as submitted by a client.
///
/// The store only accepts UTC, but clients regularly send wall-clock values
/// without any zone. Those are kept apart until [`Timestamp::to_utc`] decides
/// how to read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Carries an explicit offset (`2024-05-01T10:00:00+02:00` or `...Z`)
    Zoned(DateTime<FixedOffset>),
    /// Carries no zone (`2024-05-01T10:00:00`)
    Unspecified(NaiveDateTime),
}

impl Timestamp {
    /// Converts to UTC.
    ///
    /// Zoned values keep their instant. Zone-less values keep their wall-clock
    /// reading and are labelled UTC.
    #[must_use]
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Zoned(at) => at.with_timezone(&Utc),
            Self::Unspecified(naive) => naive.and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Zoned(at.fixed_offset())
    }
}

/// Stock row as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPayload {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub product_id: i32,
    pub quantity: i32,
    pub last_order: Timestamp,
    pub ordered_last: Timestamp,
}

impl StockPayload {
    /// Produces the storable row with both dates in UTC.
    #[must_use]
    pub fn into_model(self) -> stock::Model {
        stock::Model {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            last_order: self.last_order.to_utc(),
            ordered_last: self.ordered_last.to_utc(),
        }
    }
}

/// Discount row as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDiscountPayload {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub product_id: i32,
    pub percentage: f64,
    pub valid_from: Timestamp,
    pub expires: Timestamp,
}

impl ProductDiscountPayload {
    /// Produces the storable row with the validity window in UTC.
    #[must_use]
    pub fn into_model(self) -> product_discount::Model {
        product_discount::Model {
            id: self.id,
            product_id: self.product_id,
            percentage: self.percentage,
            valid_from: self.valid_from.to_utc(),
            expires: self.expires.to_utc(),
        }
    }
}

/// Coupon row as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponPayload {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub product_id: i32,
    pub code: String,
    pub amount: f64,
    pub valid_from: Timestamp,
    pub expires: Timestamp,
}

impl CouponPayload {
    /// Produces the storable row with the validity window in UTC.
    #[must_use]
    pub fn into_model(self) -> coupon::Model {
        coupon::Model {
            id: self.id,
            product_id: self.product_id,
            code: self.code,
            amount: self.amount,
            valid_from: self.valid_from.to_utc(),
            expires: self.expires.to_utc(),
        }
    }
}

/// A reference together with the links the client wants it to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePayload {
    #[serde(flatten)]
    pub reference: reference::Model,
    #[serde(default)]
    pub reference_products: Option<Vec<reference_product::Model>>,
}

/// Attachment metadata, optionally with new file content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUiFilePayload {
    #[serde(flatten)]
    pub file: product_ui_file::Model,
    /// Bytes to store at `folder/filename`; `None` leaves the file alone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<u8>>,
}

/// Layout with its attachments as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUiPayload {
    #[serde(flatten)]
    pub product_ui: product_ui::Model,
    #[serde(default)]
    pub product_ui_files: Option<Vec<ProductUiFilePayload>>,
}

/// Full replacement representation of a product.
///
/// Every collection is optional; a missing collection is treated as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(flatten)]
    pub product: product::Model,
    #[serde(default)]
    pub status: Option<product_status::Model>,
    #[serde(default)]
    pub brand: Option<brand::Model>,
    #[serde(default)]
    pub department: Option<department::Model>,
    #[serde(default)]
    pub cart_items: Option<Vec<cart_item::Model>>,
    #[serde(default)]
    pub order_details: Option<Vec<order_detail::Model>>,
    #[serde(default)]
    pub categories: Option<Vec<category::Model>>,
    #[serde(default)]
    pub models: Option<Vec<product_model::Model>>,
    #[serde(default)]
    pub options: Option<Vec<product_option::Model>>,
    #[serde(default)]
    pub stock: Option<Vec<StockPayload>>,
    #[serde(default)]
    pub product_discounts: Option<Vec<ProductDiscountPayload>>,
    #[serde(default)]
    pub coupons: Option<Vec<CouponPayload>>,
    #[serde(default)]
    pub references: Option<Vec<ReferencePayload>>,
    #[serde(default)]
    pub reference_products: Option<Vec<reference_product::Model>>,
    #[serde(default)]
    pub product_ui: Option<ProductUiPayload>,
}

impl ProductPayload {
    /// A payload carrying only the product row.
    #[must_use]
    pub const fn new(product: product::Model) -> Self {
        Self {
            product,
            status: None,
            brand: None,
            department: None,
            cart_items: None,
            order_details: None,
            categories: None,
            models: None,
            options: None,
            stock: None,
            product_discounts: None,
            coupons: None,
            references: None,
            reference_products: None,
            product_ui: None,
        }
    }
}

/// A stored reference with its links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGraph {
    #[serde(flatten)]
    pub reference: reference::Model,
    pub reference_products: Vec<reference_product::Model>,
}

/// A stored layout with its attachments, ordered by `sort_order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUiGraph {
    #[serde(flatten)]
    pub product_ui: product_ui::Model,
    pub product_ui_files: Vec<product_ui_file::Model>,
}

/// The product aggregate: product row plus everything it owns or points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGraph {
    #[serde(flatten)]
    pub product: product::Model,
    pub status: Option<product_status::Model>,
    pub brand: Option<brand::Model>,
    pub department: Option<department::Model>,
    pub cart_items: Vec<cart_item::Model>,
    pub order_details: Vec<order_detail::Model>,
    pub categories: Vec<category::Model>,
    pub models: Vec<product_model::Model>,
    pub options: Vec<product_option::Model>,
    pub stock: Vec<stock::Model>,
    pub product_discounts: Vec<product_discount::Model>,
    pub coupons: Vec<coupon::Model>,
    pub references: Vec<ReferenceGraph>,
    pub reference_products: Vec<reference_product::Model>,
    pub product_ui: Option<ProductUiGraph>,
}

impl ProductGraph {
    /// A graph with no children.
    #[must_use]
    pub const fn new(product: product::Model) -> Self {
        Self {
            product,
            status: None,
            brand: None,
            department: None,
            cart_items: Vec::new(),
            order_details: Vec::new(),
            categories: Vec::new(),
            models: Vec::new(),
            options: Vec::new(),
            stock: Vec::new(),
            product_discounts: Vec::new(),
            coupons: Vec::new(),
            references: Vec::new(),
            reference_products: Vec::new(),
            product_ui: None,
        }
    }

    /// Looks up a stored attachment by id.
    #[must_use]
    pub fn ui_file(&self, file_id: i32) -> Option<&product_ui_file::Model> {
        self.product_ui
            .as_ref()?
            .product_ui_files
            .iter()
            .find(|file| file.id == file_id)
    }
}
