//! Product update handler.
//!
//! Applies a full replacement payload to a stored product:
//! 1. Load the stored aggregate (`NotFound` if missing)
//! 2. Drop server-owned fields from the payload
//! 3. Delete links that vanished from references still present in the payload
//! 4. Reduce categories to new memberships and models/options to new rows,
//!    bring every date to UTC
//! 5. Persist in one transaction (`BadRequest` if nothing was written)
//! 6. Write new attachment content and delete the files it replaces
//! 7. Return the aggregate as stored
//!
//! File writes happen after the commit and are not rolled back with it.

use crate::{
    assets::{AssetStore, check_relative},
    core::reconcile::{FileUpload, WriteSet, into_write_set, sanitize, stale_reference_products},
    errors::{Error, Result},
    handlers::{ProductStore, ReferenceService},
    models::{ProductGraph, ProductPayload},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Request to replace a stored product with `product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdateCommand {
    pub product: ProductPayload,
}

impl ProductUpdateCommand {
    #[must_use]
    pub const fn new(product: ProductPayload) -> Self {
        Self { product }
    }
}

/// Runs [`ProductUpdateCommand`]s against a store, a reference service and an
/// attachment store.
#[derive(Debug, Clone)]
pub struct ProductUpdateHandler<S, R, A> {
    store: S,
    references: R,
    assets: A,
}

impl<S, R, A> ProductUpdateHandler<S, R, A>
where
    S: ProductStore,
    R: ReferenceService,
    A: AssetStore,
{
    #[must_use]
    pub const fn new(store: S, references: R, assets: A) -> Self {
        Self {
            store,
            references,
            assets,
        }
    }

    /// Applies the update and returns the stored aggregate.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if no product has the payload's ID
    /// - [`Error::BadRequest`] if an attachment path is invalid or the write
    ///   affected no rows
    /// - database and file-system errors unchanged
    #[instrument(skip_all, fields(product_id = command.product.product.id))]
    pub async fn handle(&self, command: ProductUpdateCommand) -> Result<ProductGraph> {
        let product_id = command.product.product.id;
        let existing = self
            .store
            .load(product_id)
            .await?
            .ok_or_else(|| Error::not_found("Product", product_id))?;

        let payload = sanitize(command.product);
        check_upload_paths(&payload)?;
        self.remove_stale_reference_products(&payload).await?;

        let WriteSet { graph, uploads } = into_write_set(payload, &existing);

        let affected = self.store.save(&graph).await?;
        if affected == 0 {
            warn!("Update of product {product_id} affected no rows");
            return Err(Error::BadRequest {
                message: format!("Update of product {product_id} affected no rows"),
            });
        }
        info!(
            "Updated product {product_id}: {affected} rows, {} new categories, {} uploads",
            graph.categories.len(),
            uploads.len()
        );

        self.sync_files(&existing, &uploads).await?;

        self.store
            .load(product_id)
            .await?
            .ok_or_else(|| Error::not_found("Product", product_id))
    }

    /// Deletes links that the stored version of a submitted reference has and
    /// the submitted version no longer lists.
    ///
    /// References missing from the payload altogether are not looked at, their
    /// links stay as they are.
    async fn remove_stale_reference_products(&self, payload: &ProductPayload) -> Result<()> {
        let mut stale = Vec::new();
        for reference in payload
            .references
            .iter()
            .flatten()
            .filter(|r| r.reference.id > 0)
        {
            let stored = self.references.reference_by_id(reference.reference.id).await?;
            stale.extend(stale_reference_products(&stored, reference));
        }

        let removed = self.references.delete_reference_products(&stale).await?;
        debug!("Removed {removed} stale reference product links");
        Ok(())
    }

    /// Writes uploaded content and deletes the file each upload replaces.
    ///
    /// A replaced file is kept when any upload of the same update targets its
    /// path, so attachments can trade names without losing content.
    async fn sync_files(&self, existing: &ProductGraph, uploads: &[FileUpload]) -> Result<()> {
        let targets: HashSet<(&str, &str)> = uploads
            .iter()
            .map(|upload| (upload.file.folder.as_str(), upload.file.filename.as_str()))
            .collect();

        for upload in uploads {
            let file = &upload.file;
            self.assets
                .write(&file.folder, &file.filename, &upload.content)
                .await?;
        }

        for upload in uploads {
            let Some(old) = existing.ui_file(upload.file.id) else {
                continue;
            };
            if !targets.contains(&(old.folder.as_str(), old.filename.as_str())) {
                self.assets.remove(&old.folder, &old.filename).await?;
            }
        }
        Ok(())
    }
}

/// Fails before anything is written if an attachment with content points
/// outside the web root.
fn check_upload_paths(payload: &ProductPayload) -> Result<()> {
    payload
        .product_ui
        .iter()
        .flat_map(|ui| ui.product_ui_files.iter().flatten())
        .filter(|entry| entry.content.is_some())
        .try_for_each(|entry| check_relative(&entry.file.folder, &entry.file.filename))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::{
        assets::LocalAssetStore,
        entities::{brand, cart_item, product, product_model, product_option, reference_product},
        handlers::Catalog,
        models::{ReferenceGraph, StockPayload, Timestamp},
        test_utils::*,
    };
    use chrono::{NaiveDate, TimeZone, Utc};
    use sea_orm::DatabaseConnection;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    fn handler(
        db: &DatabaseConnection,
        web_root: &Path,
    ) -> ProductUpdateHandler<Catalog, Catalog, LocalAssetStore> {
        let catalog = Catalog::new(db.clone());
        ProductUpdateHandler::new(catalog.clone(), catalog, LocalAssetStore::new(web_root))
    }

    /// Database-backed references that remember every delete request.
    #[derive(Clone)]
    struct RecordingReferences {
        inner: Catalog,
        deleted: Arc<Mutex<Vec<reference_product::Model>>>,
    }

    impl ReferenceService for RecordingReferences {
        async fn reference_by_id(&self, reference_id: i32) -> Result<ReferenceGraph> {
            self.inner.reference_by_id(reference_id).await
        }

        async fn delete_reference_products(
            &self,
            links: &[reference_product::Model],
        ) -> Result<u64> {
            self.deleted.lock().unwrap().extend_from_slice(links);
            self.inner.delete_reference_products(links).await
        }
    }

    /// A store whose writes never match a row.
    struct ZeroRowStore {
        graph: ProductGraph,
    }

    impl ProductStore for ZeroRowStore {
        async fn load(&self, _product_id: i32) -> Result<Option<ProductGraph>> {
            Ok(Some(self.graph.clone()))
        }

        async fn save(&self, _graph: &ProductGraph) -> Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_update_missing_product() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.product.id = 999;

        let result = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await;

        match result {
            Err(err @ Error::NotFound { .. }) => assert!(err.to_string().contains("Product/999")),
            other => panic!("expected NotFound, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_update_changes_product_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.product.name = "Desk Lamp".to_string();
        payload.product.description = Some("Adjustable arm".to_string());

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(updated.product.name, "Desk Lamp");
        assert_eq!(updated.product.description.as_deref(), Some("Adjustable arm"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_adds_only_new_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        let one = create_test_category(&db, "One").await?;
        let two = create_test_category(&db, "Two").await?;
        let three = create_test_category(&db, "Three").await?;
        link_category(&db, product.id, one.id).await?;
        link_category(&db, product.id, two.id).await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.categories = Some(vec![two.clone(), three.clone()]);

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        // Nothing is detached, only the missing membership is added
        assert_eq!(updated.categories, vec![one, two, three]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_inserts_only_new_models_and_options() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        let stored = create_test_model(&db, product.id, "Black").await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.models = Some(vec![
            product_model::Model {
                name: "Renamed".to_string(),
                ..stored.clone()
            },
            product_model::Model {
                id: 0,
                product_id: 0,
                name: "White".to_string(),
                sku: None,
            },
        ]);
        payload.options = Some(vec![product_option::Model {
            id: 0,
            product_id: 0,
            name: "Gift wrap".to_string(),
            surcharge: 2.5,
        }]);

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        let names: Vec<&str> = updated.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Black", "White"]);
        assert_eq!(updated.models[0], stored);
        assert_eq!(updated.options.len(), 1);
        assert_eq!(updated.options[0].product_id, product.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_stores_dates_as_utc() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;

        let wall_clock = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let zoned = chrono::FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 12, 0, 0)
            .unwrap();

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.stock = Some(vec![StockPayload {
            id: 0,
            product_id: 0,
            quantity: 3,
            last_order: Timestamp::Unspecified(wall_clock),
            ordered_last: Timestamp::Zoned(zoned),
        }]);

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        let stock = &updated.stock[0];
        assert_eq!(stock.last_order, wall_clock.and_utc());
        assert_eq!(
            stock.ordered_last,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_ignores_server_owned_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.brand = Some(brand::Model {
            id: 0,
            name: "Injected".to_string(),
        });
        payload.cart_items = Some(vec![cart_item::Model {
            id: 0,
            product_id: product.id,
            quantity: 100,
        }]);

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert!(updated.brand.is_none());
        assert!(updated.cart_items.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_deletes_stale_reference_links() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        let kept = create_test_product(&db, "Bulb").await?;
        let dropped = create_test_product(&db, "Shade").await?;
        let reference =
            create_test_reference(&db, product.id, "Fits with", &[kept.id, dropped.id]).await?;
        let dropped_link = reference.reference_products[1].clone();

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        if let Some(references) = payload.references.as_mut() {
            references[0]
                .reference_products
                .as_mut()
                .unwrap()
                .retain(|link| link.product_id == kept.id);
        }

        let catalog = Catalog::new(db.clone());
        let references = RecordingReferences {
            inner: catalog.clone(),
            deleted: Arc::default(),
        };
        let handler = ProductUpdateHandler::new(
            catalog,
            references.clone(),
            LocalAssetStore::new(root.path()),
        );

        let updated = handler.handle(ProductUpdateCommand::new(payload)).await?;

        assert_eq!(*references.deleted.lock().unwrap(), vec![dropped_link]);
        let links: Vec<i32> = updated.references[0]
            .reference_products
            .iter()
            .map(|link| link.product_id)
            .collect();
        assert_eq!(links, vec![kept.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_resent_link_without_id_is_not_duplicated() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        let other = create_test_product(&db, "Bulb").await?;
        let reference = create_test_reference(&db, product.id, "Fits with", &[other.id]).await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        if let Some(references) = payload.references.as_mut() {
            references[0].reference_products = Some(vec![reference_product::Model {
                id: 0,
                reference_id: reference.reference.id,
                product_id: other.id,
            }]);
        }

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(
            updated.references[0].reference_products,
            reference.reference_products
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_links_of_omitted_references() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        let other = create_test_product(&db, "Bulb").await?;
        create_test_reference(&db, product.id, "Fits with", &[other.id]).await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.references = Some(Vec::new());

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(updated.references.len(), 1);
        assert_eq!(updated.references[0].reference_products.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_attachment_file() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        create_test_ui(&db, product.id, &[("img", "old.png")]).await?;
        let old_path = root.path().join("img").join("old.png");
        std::fs::create_dir_all(root.path().join("img"))?;
        std::fs::write(&old_path, b"old")?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        let entry = &mut payload.product_ui.as_mut().unwrap().product_ui_files.as_mut().unwrap()[0];
        entry.file.filename = "new.png".to_string();
        entry.content = Some(b"new".to_vec());

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(std::fs::read(root.path().join("img").join("new.png"))?, b"new");
        assert!(!old_path.exists());
        let files = &updated.product_ui.unwrap().product_ui_files;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "new.png");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rewrites_attachment_in_place() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        create_test_ui(&db, product.id, &[("img", "same.png")]).await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        let entry = &mut payload.product_ui.as_mut().unwrap().product_ui_files.as_mut().unwrap()[0];
        entry.content = Some(b"fresh".to_vec());

        handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(std::fs::read(root.path().join("img").join("same.png"))?, b"fresh");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_swaps_attachment_names() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        create_test_ui(&db, product.id, &[("img", "a.png"), ("img", "b.png")]).await?;
        std::fs::create_dir_all(root.path().join("img"))?;
        std::fs::write(root.path().join("img").join("a.png"), b"old a")?;
        std::fs::write(root.path().join("img").join("b.png"), b"old b")?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        let files = payload.product_ui.as_mut().unwrap().product_ui_files.as_mut().unwrap();
        files[0].file.filename = "b.png".to_string();
        files[0].content = Some(b"first".to_vec());
        files[1].file.filename = "a.png".to_string();
        files[1].content = Some(b"second".to_vec());

        let updated = handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        let names: Vec<String> = updated
            .product_ui
            .unwrap()
            .product_ui_files
            .into_iter()
            .map(|f| f.filename)
            .collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
        assert_eq!(std::fs::read(root.path().join("img").join("b.png"))?, b"first");
        assert_eq!(std::fs::read(root.path().join("img").join("a.png"))?, b"second");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_without_content_leaves_files_alone() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let product = create_test_product(&db, "Lamp").await?;
        create_test_ui(&db, product.id, &[("img", "keep.png")]).await?;
        let path = root.path().join("img").join("keep.png");
        std::fs::create_dir_all(root.path().join("img"))?;
        std::fs::write(&path, b"keep")?;

        let payload = payload_from(&load_graph(&db, product.id).await?);
        handler(&db, root.path())
            .handle(ProductUpdateCommand::new(payload))
            .await?;

        assert_eq!(std::fs::read(&path)?, b"keep");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_attachment_outside_web_root() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let web_root = root.path().join("www");
        let product = create_test_product(&db, "Lamp").await?;
        create_test_ui(&db, product.id, &[("img", "a.png")]).await?;

        let mut payload = payload_from(&load_graph(&db, product.id).await?);
        payload.product.name = "Changed".to_string();
        let entry = &mut payload.product_ui.as_mut().unwrap().product_ui_files.as_mut().unwrap()[0];
        entry.file.folder = "..".to_string();
        entry.content = Some(b"x".to_vec());

        let result = handler(&db, &web_root)
            .handle(ProductUpdateCommand::new(payload))
            .await;

        assert!(matches!(result, Err(Error::BadRequest { .. })));
        assert!(!root.path().join("a.png").exists());
        assert_eq!(load_graph(&db, product.id).await?.product.name, "Lamp");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_zero_rows_is_bad_request() -> Result<()> {
        let db = setup_test_db().await?;
        let root = tempfile::tempdir()?;
        let row = product::Model {
            id: 5,
            name: "Ghost".to_string(),
            description: None,
            price: 1.0,
            status_id: None,
            brand_id: None,
            department_id: None,
        };
        let handler = ProductUpdateHandler::new(
            ZeroRowStore {
                graph: ProductGraph::new(row.clone()),
            },
            Catalog::new(db),
            LocalAssetStore::new(root.path()),
        );

        let result = handler
            .handle(ProductUpdateCommand::new(ProductPayload::new(row)))
            .await;

        assert!(matches!(result, Err(Error::BadRequest { .. })));
        Ok(())
    }
}
