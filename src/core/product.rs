//! Product business logic - Loads and writes the product aggregate.
//!
//! A [`ProductGraph`] is read with one query per child table and written inside
//! a single database transaction. Writing follows upsert rules: rows with ID 0
//! are inserted, all other rows are updated in place. Nothing is deleted here;
//! removals are explicit operations elsewhere (see [`crate::core::reference`]).

use crate::{
    core::reference::get_references_for_product,
    entities::{
        Brand, CartItem, Category, Coupon, Department, Models, OrderDetail, Options, Product,
        ProductCategory, ProductDiscount, ProductStatus, ProductUi, ProductUiFile,
        ReferenceProduct, Stock, category, coupon, product, product_category, product_discount,
        product_model, product_option, product_ui, product_ui_file, reference, reference_product,
        stock,
    },
    errors::Result,
    models::{ProductGraph, ProductUiGraph},
};
use sea_orm::{
    ActiveModelBehavior, ActiveValue, DatabaseTransaction, IntoActiveModel, NotSet, QueryOrder,
    Set, TransactionTrait, prelude::*,
};
use tracing::debug;

/// Retrieves a specific product row by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i32) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the full aggregate for a product, or None if the product does not exist.
///
/// The result is a detached snapshot: changing it has no effect on the store
/// until it is passed to [`save_product_graph`].
pub async fn load_product_graph<C>(db: &C, product_id: i32) -> Result<Option<ProductGraph>>
where
    C: ConnectionTrait,
{
    let Some(product) = get_product_by_id(db, product_id).await? else {
        return Ok(None);
    };

    let status = match product.status_id {
        Some(id) => ProductStatus::find_by_id(id).one(db).await?,
        None => None,
    };
    let brand = match product.brand_id {
        Some(id) => Brand::find_by_id(id).one(db).await?,
        None => None,
    };
    let department = match product.department_id {
        Some(id) => Department::find_by_id(id).one(db).await?,
        None => None,
    };

    let category_ids: Vec<i32> = ProductCategory::find()
        .filter(product_category::Column::ProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.category_id)
        .collect();
    let categories = Category::find()
        .filter(category::Column::Id.is_in(category_ids))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;

    let models = Models::find()
        .filter(product_model::Column::ProductId.eq(product_id))
        .order_by_asc(product_model::Column::Id)
        .all(db)
        .await?;
    let options = Options::find()
        .filter(product_option::Column::ProductId.eq(product_id))
        .order_by_asc(product_option::Column::Id)
        .all(db)
        .await?;
    let stock = Stock::find()
        .filter(stock::Column::ProductId.eq(product_id))
        .order_by_asc(stock::Column::Id)
        .all(db)
        .await?;
    let product_discounts = ProductDiscount::find()
        .filter(product_discount::Column::ProductId.eq(product_id))
        .order_by_asc(product_discount::Column::Id)
        .all(db)
        .await?;
    let coupons = Coupon::find()
        .filter(coupon::Column::ProductId.eq(product_id))
        .order_by_asc(coupon::Column::Id)
        .all(db)
        .await?;
    let cart_items = CartItem::find()
        .filter(crate::entities::cart_item::Column::ProductId.eq(product_id))
        .all(db)
        .await?;
    let order_details = OrderDetail::find()
        .filter(crate::entities::order_detail::Column::ProductId.eq(product_id))
        .all(db)
        .await?;

    let references = get_references_for_product(db, product_id).await?;
    let reference_products = ReferenceProduct::find()
        .filter(reference_product::Column::ProductId.eq(product_id))
        .order_by_asc(reference_product::Column::Id)
        .all(db)
        .await?;

    let product_ui = match ProductUi::find()
        .filter(product_ui::Column::ProductId.eq(product_id))
        .one(db)
        .await?
    {
        Some(product_ui) => {
            let product_ui_files = ProductUiFile::find()
                .filter(product_ui_file::Column::ProductUiId.eq(product_ui.id))
                .order_by_asc(product_ui_file::Column::SortOrder)
                .order_by_asc(product_ui_file::Column::Id)
                .all(db)
                .await?;
            Some(ProductUiGraph {
                product_ui,
                product_ui_files,
            })
        }
        None => None,
    };

    Ok(Some(ProductGraph {
        product,
        status,
        brand,
        department,
        cart_items,
        order_details,
        categories,
        models,
        options,
        stock,
        product_discounts,
        coupons,
        references,
        reference_products,
        product_ui,
    }))
}

/// Writes the aggregate in one transaction and returns the number of affected rows.
///
/// - The product row is updated in place.
/// - Every listed category is attached; categories with ID 0 are created first.
/// - Models, options, stock, discounts, coupons, references, their links, the
///   UI layout and its files are upserted.
/// - Status, brand, department, cart items and order details are never written.
///
/// Child foreign keys are taken from the graph itself, so submitted rows do not
/// need to carry them. Any database error rolls the whole write back.
pub async fn save_product_graph<C>(db: &C, graph: &ProductGraph) -> Result<u64>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;
    let affected = write_graph(&txn, graph).await?;
    txn.commit().await?;

    debug!(
        "Saved product {} ({affected} rows affected)",
        graph.product.id
    );
    Ok(affected)
}

async fn write_graph(txn: &DatabaseTransaction, graph: &ProductGraph) -> Result<u64> {
    let product_id = graph.product.id;
    let mut affected = 0;

    let row = product::ActiveModel {
        id: Set(product_id),
        name: Set(graph.product.name.clone()),
        description: Set(graph.product.description.clone()),
        price: Set(graph.product.price),
        status_id: Set(graph.product.status_id),
        brand_id: Set(graph.product.brand_id),
        department_id: Set(graph.product.department_id),
    };
    affected += count(upsert(txn, row, false).await?.as_ref());

    for category in &graph.categories {
        let category_id = if category.id == 0 {
            let row = category::ActiveModel {
                id: NotSet,
                name: Set(category.name.clone()),
            };
            let inserted = row.insert(txn).await?;
            affected += 1;
            inserted.id
        } else {
            category.id
        };

        let link = product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
        };
        affected += ProductCategory::insert(link)
            .exec_without_returning(txn)
            .await?;
    }

    for model in &graph.models {
        let row = product_model::ActiveModel {
            id: key(model.id),
            product_id: Set(product_id),
            name: Set(model.name.clone()),
            sku: Set(model.sku.clone()),
        };
        affected += count(upsert(txn, row, model.id == 0).await?.as_ref());
    }

    for option in &graph.options {
        let row = product_option::ActiveModel {
            id: key(option.id),
            product_id: Set(product_id),
            name: Set(option.name.clone()),
            surcharge: Set(option.surcharge),
        };
        affected += count(upsert(txn, row, option.id == 0).await?.as_ref());
    }

    for item in &graph.stock {
        let row = stock::ActiveModel {
            id: key(item.id),
            product_id: Set(product_id),
            quantity: Set(item.quantity),
            last_order: Set(item.last_order),
            ordered_last: Set(item.ordered_last),
        };
        affected += count(upsert(txn, row, item.id == 0).await?.as_ref());
    }

    for discount in &graph.product_discounts {
        let row = product_discount::ActiveModel {
            id: key(discount.id),
            product_id: Set(product_id),
            percentage: Set(discount.percentage),
            valid_from: Set(discount.valid_from),
            expires: Set(discount.expires),
        };
        affected += count(upsert(txn, row, discount.id == 0).await?.as_ref());
    }

    for coupon in &graph.coupons {
        let row = coupon::ActiveModel {
            id: key(coupon.id),
            product_id: Set(product_id),
            code: Set(coupon.code.clone()),
            amount: Set(coupon.amount),
            valid_from: Set(coupon.valid_from),
            expires: Set(coupon.expires),
        };
        affected += count(upsert(txn, row, coupon.id == 0).await?.as_ref());
    }

    for reference in &graph.references {
        let row = reference::ActiveModel {
            id: key(reference.reference.id),
            product_id: Set(product_id),
            name: Set(reference.reference.name.clone()),
        };
        let saved = upsert(txn, row, reference.reference.id == 0).await?;
        affected += count(saved.as_ref());
        let reference_id = saved.map_or(reference.reference.id, |r| r.id);

        for link in &reference.reference_products {
            affected += write_link(txn, link, reference_id).await?;
        }
    }

    for link in &graph.reference_products {
        affected += write_link(txn, link, link.reference_id).await?;
    }

    if let Some(ui) = &graph.product_ui {
        let row = product_ui::ActiveModel {
            id: key(ui.product_ui.id),
            product_id: Set(product_id),
            layout: Set(ui.product_ui.layout.clone()),
        };
        let saved = upsert(txn, row, ui.product_ui.id == 0).await?;
        affected += count(saved.as_ref());
        let product_ui_id = saved.map_or(ui.product_ui.id, |u| u.id);

        for file in &ui.product_ui_files {
            let row = product_ui_file::ActiveModel {
                id: key(file.id),
                product_ui_id: Set(product_ui_id),
                folder: Set(file.folder.clone()),
                filename: Set(file.filename.clone()),
                sort_order: Set(file.sort_order),
            };
            affected += count(upsert(txn, row, file.id == 0).await?.as_ref());
        }
    }

    Ok(affected)
}

async fn write_link(
    txn: &DatabaseTransaction,
    link: &reference_product::Model,
    reference_id: i32,
) -> Result<u64> {
    // A reference links to each product at most once
    if link.id == 0 {
        let linked = ReferenceProduct::find()
            .filter(reference_product::Column::ReferenceId.eq(reference_id))
            .filter(reference_product::Column::ProductId.eq(link.product_id))
            .one(txn)
            .await?;
        if linked.is_some() {
            return Ok(0);
        }
    }

    let row = reference_product::ActiveModel {
        id: key(link.id),
        reference_id: Set(reference_id),
        product_id: Set(link.product_id),
    };
    Ok(count(upsert(txn, row, link.id == 0).await?.as_ref()))
}

/// Primary key value for a row that may not exist yet.
const fn key(id: i32) -> ActiveValue<i32> {
    if id == 0 { NotSet } else { Set(id) }
}

const fn count<T>(row: Option<&T>) -> u64 {
    if row.is_some() { 1 } else { 0 }
}

/// Inserts `row` when `is_new`, otherwise updates it.
///
/// An update that matches no row yields None instead of an error.
async fn upsert<A>(
    txn: &DatabaseTransaction,
    row: A,
    is_new: bool,
) -> Result<Option<<A::Entity as EntityTrait>::Model>>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    if is_new {
        return Ok(Some(row.insert(txn).await?));
    }

    match row.update(txn).await {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
