use std::sync::Arc;

use furni_merge::{CatalogMerger, MergeError};
use furni_store::{build_backend, ResourceCategory, StorageBackend, StorageConfig};
use furni_types::{Asset, AssetKind, CatalogDocument, Fields, Item, ItemId};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::locks::FileLocks;

/// Catalog operations over a storage backend.
///
/// Documents are never cached: every call reads the current stored state.
/// Update and add hold a per-document lock across their read-merge-write
/// cycle, and write back the whole document under the same filename. The lock
/// is keyed on the resolved location, so `F.json` and `./F.json` share one.
pub struct StorageService {
    backend: Arc<dyn StorageBackend>,
    merger: CatalogMerger,
    locks: FileLocks,
}

impl StorageService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_merger(backend, CatalogMerger::new())
    }

    pub fn with_merger(backend: Arc<dyn StorageBackend>, merger: CatalogMerger) -> Self {
        Self {
            backend,
            merger,
            locks: FileLocks::new(),
        }
    }

    /// Build the configured backend and wrap it.
    pub fn from_config(config: &StorageConfig) -> ServiceResult<Self> {
        let backend = build_backend(config).map_err(|e| ServiceError::from_store("backend", e))?;
        Ok(Self::new(backend))
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Fetch and parse a catalog document.
    ///
    /// Content that is present but not a JSON object is reported as
    /// [`ServiceError::NotFound`].
    pub async fn read_catalog(&self, filename: &str) -> ServiceResult<CatalogDocument> {
        let text = self
            .backend
            .read_text(ResourceCategory::Catalog, filename)
            .await
            .map_err(|e| ServiceError::from_store(filename, e))?;

        CatalogDocument::from_slice(text.as_bytes()).map_err(|e| {
            warn!(filename, error = %e, "catalog document is not parseable");
            ServiceError::NotFound {
                filename: filename.to_string(),
            }
        })
    }

    /// Store a whole catalog document, replacing what was there.
    pub async fn write_catalog(
        &self,
        filename: &str,
        document: &CatalogDocument,
    ) -> ServiceResult<()> {
        let text = document
            .to_pretty_json()
            .map_err(|source| ServiceError::Serialization {
                filename: filename.to_string(),
                source,
            })?;
        self.backend
            .write_text(ResourceCategory::Catalog, filename, &text)
            .await
            .map_err(|e| ServiceError::from_store(filename, e))
    }

    /// Merge `updates` into the item identified by `item_id` and persist.
    pub async fn update_item(
        &self,
        filename: &str,
        item_id: &ItemId,
        updates: &Fields,
    ) -> ServiceResult<Item> {
        let _guard = self.lock_catalog(filename).await?;
        let document = self.read_catalog(filename).await?;

        let (document, item) = self
            .merger
            .merge_update(document, item_id, updates)
            .map_err(|e| merge_error(filename, e))?;

        self.write_catalog(filename, &document).await?;
        info!(filename, %item_id, fields = updates.len(), "item updated");
        Ok(item)
    }

    /// Append a new item built from `item_data` and persist.
    pub async fn add_item(&self, filename: &str, item_data: &Fields) -> ServiceResult<Item> {
        let _guard = self.lock_catalog(filename).await?;
        let document = self.read_catalog(filename).await?;

        let (document, item) = self
            .merger
            .merge_add(document, item_data)
            .map_err(|e| merge_error(filename, e))?;

        self.write_catalog(filename, &document).await?;
        info!(filename, id = ?item.get("id"), "item added");
        Ok(item)
    }

    async fn lock_catalog(&self, filename: &str) -> ServiceResult<OwnedMutexGuard<()>> {
        let location = self
            .backend
            .locate(ResourceCategory::Catalog, filename)
            .map_err(|e| ServiceError::from_store(filename, e))?;
        Ok(self.locks.lock(&location).await)
    }

    /// Classify and store an uploaded asset under its original filename.
    ///
    /// Returns the stored name.
    pub async fn upload_asset(&self, asset: &Asset) -> ServiceResult<String> {
        let kind = asset.kind().ok_or_else(|| ServiceError::InvalidAsset {
            filename: asset.filename.clone(),
            media_type: asset.media_type.clone(),
        })?;
        let category = match kind {
            AssetKind::Icon => ResourceCategory::Icons,
            AssetKind::FurniturePackage => ResourceCategory::FurnitureAssets,
        };
        debug!(filename = %asset.filename, %kind, size = asset.size(), "uploading asset");

        self.backend
            .write_binary(category, &asset.filename, &asset.data, &asset.media_type)
            .await
            .map_err(|e| ServiceError::from_store(&asset.filename, e))?;

        info!(filename = %asset.filename, %kind, "asset uploaded");
        Ok(asset.filename.clone())
    }
}

fn merge_error(filename: &str, err: MergeError) -> ServiceError {
    match err {
        MergeError::ItemNotFound(item_id) => ServiceError::ItemNotFound {
            filename: filename.to_string(),
            item_id,
        },
        MergeError::NoTargetCollection => ServiceError::NoTargetCollection {
            filename: filename.to_string(),
        },
    }
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("backend", &self.backend.kind())
            .finish()
    }
}
