//! Use-case handlers and the collaborators they depend on.
//!
//! Handlers talk to the outside world only through the traits declared here
//! (plus [`crate::assets::AssetStore`]), so each dependency can be swapped out
//! independently. [`Catalog`] is the database-backed implementation of both.

/// Full-replacement update of a product aggregate
pub mod product_update;

pub use product_update::{ProductUpdateCommand, ProductUpdateHandler};

use crate::{
    core::{product, reference},
    entities::reference_product,
    errors::{Error, Result},
    models::{ProductGraph, ReferenceGraph},
};
use sea_orm::DatabaseConnection;

/// Reads and writes whole product aggregates.
pub trait ProductStore {
    /// Loads the aggregate, or None if the product does not exist.
    async fn load(&self, product_id: i32) -> Result<Option<ProductGraph>>;

    /// Persists the aggregate and returns the number of affected rows.
    async fn save(&self, graph: &ProductGraph) -> Result<u64>;
}

/// Reference queries and commands the product update delegates to.
pub trait ReferenceService {
    /// Current stored state of a reference with its links.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the reference does not exist.
    async fn reference_by_id(&self, reference_id: i32) -> Result<ReferenceGraph>;

    /// Deletes the given links and returns how many were removed.
    async fn delete_reference_products(&self, links: &[reference_product::Model]) -> Result<u64>;
}

/// Database-backed [`ProductStore`] and [`ReferenceService`].
#[derive(Debug, Clone)]
pub struct Catalog {
    database: DatabaseConnection,
}

impl Catalog {
    /// Wraps a connection. Connections are cheap to clone, so one catalog per
    /// handler is fine.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// The underlying connection
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

impl ProductStore for Catalog {
    async fn load(&self, product_id: i32) -> Result<Option<ProductGraph>> {
        product::load_product_graph(&self.database, product_id).await
    }

    async fn save(&self, graph: &ProductGraph) -> Result<u64> {
        product::save_product_graph(&self.database, graph).await
    }
}

impl ReferenceService for Catalog {
    async fn reference_by_id(&self, reference_id: i32) -> Result<ReferenceGraph> {
        reference::get_reference_with_products(&self.database, reference_id)
            .await?
            .ok_or_else(|| Error::not_found("Reference", reference_id))
    }

    async fn delete_reference_products(&self, links: &[reference_product::Model]) -> Result<u64> {
        reference::delete_reference_products(&self.database, links).await
    }
}
