//! Entity module - Contains all SeaORM entity definitions for the product catalog.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod brand;
pub mod cart_item;
pub mod category;
pub mod coupon;
pub mod department;
pub mod order_detail;
pub mod product;
pub mod product_category;
pub mod product_discount;
pub mod product_model;
pub mod product_option;
pub mod product_status;
pub mod product_ui;
pub mod product_ui_file;
pub mod reference;
pub mod reference_product;
pub mod stock;

// Re-export entities under their table-facing names to avoid `Entity` clashes
pub use brand::Entity as Brand;
pub use cart_item::Entity as CartItem;
pub use category::Entity as Category;
pub use coupon::Entity as Coupon;
pub use department::Entity as Department;
pub use order_detail::Entity as OrderDetail;
pub use product::Entity as Product;
pub use product_category::Entity as ProductCategory;
pub use product_discount::Entity as ProductDiscount;
pub use product_model::Entity as Models;
pub use product_option::Entity as Options;
pub use product_status::Entity as ProductStatus;
pub use product_ui::Entity as ProductUi;
pub use product_ui_file::Entity as ProductUiFile;
pub use reference::Entity as Reference;
pub use reference_product::Entity as ReferenceProduct;
pub use stock::Entity as Stock;
