//! Reference business logic - Reads references with their links and removes
//! stale links.
//!
//! These are the operations the product update delegates to when it reconciles
//! cross-references. They work on any connection or transaction.

use crate::{
    entities::{Reference, ReferenceProduct, reference, reference_product},
    errors::Result,
    models::ReferenceGraph,
};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;
use tracing::debug;

/// Retrieves a reference by ID together with all of its links.
///
/// Returns None if the reference does not exist.
pub async fn get_reference_with_products<C>(
    db: &C,
    reference_id: i32,
) -> Result<Option<ReferenceGraph>>
where
    C: ConnectionTrait,
{
    let Some(reference) = Reference::find_by_id(reference_id).one(db).await? else {
        return Ok(None);
    };

    let mut graphs = with_reference_products(db, vec![reference]).await?;
    Ok(graphs.pop())
}

/// Retrieves every reference owned by a product, ordered by ID, each with its links.
pub async fn get_references_for_product<C>(db: &C, product_id: i32) -> Result<Vec<ReferenceGraph>>
where
    C: ConnectionTrait,
{
    let references = Reference::find()
        .filter(reference::Column::ProductId.eq(product_id))
        .order_by_asc(reference::Column::Id)
        .all(db)
        .await?;

    with_reference_products(db, references).await
}

/// Attaches links to already loaded references using a single query.
async fn with_reference_products<C>(
    db: &C,
    references: Vec<reference::Model>,
) -> Result<Vec<ReferenceGraph>>
where
    C: ConnectionTrait,
{
    if references.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = references.iter().map(|r| r.id).collect();
    let mut links_by_reference: HashMap<i32, Vec<reference_product::Model>> = HashMap::new();
    for link in ReferenceProduct::find()
        .filter(reference_product::Column::ReferenceId.is_in(ids))
        .order_by_asc(reference_product::Column::Id)
        .all(db)
        .await?
    {
        links_by_reference
            .entry(link.reference_id)
            .or_default()
            .push(link);
    }

    Ok(references
        .into_iter()
        .map(|reference| ReferenceGraph {
            reference_products: links_by_reference
                .remove(&reference.id)
                .unwrap_or_default(),
            reference,
        })
        .collect())
}

/// Deletes the given links by ID and returns the number of rows removed.
///
/// An empty slice is a no-op and never touches the database.
pub async fn delete_reference_products<C>(
    db: &C,
    links: &[reference_product::Model],
) -> Result<u64>
where
    C: ConnectionTrait,
{
    if links.is_empty() {
        return Ok(0);
    }

    let ids: Vec<i32> = links.iter().map(|link| link.id).collect();
    let result = ReferenceProduct::delete_many()
        .filter(reference_product::Column::Id.is_in(ids))
        .exec(db)
        .await?;

    debug!(
        "Deleted {} of {} reference product links",
        result.rows_affected,
        links.len()
    );
    Ok(result.rows_affected)
}
