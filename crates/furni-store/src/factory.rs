//! Backend selection.
//!
//! The active variant is chosen once, from [`StorageConfig::backend`], and
//! returned behind `Arc<dyn StorageBackend>`. Callers never branch on the
//! backend kind again.

use std::sync::Arc;

use tracing::info;

use crate::config::{BackendKind, StorageConfig};
use crate::error::StoreResult;
use crate::filesystem::FilesystemBackend;
use crate::object::ObjectStoreBackend;
use crate::traits::StorageBackend;

/// Build the configured storage backend.
pub fn build_backend(config: &StorageConfig) -> StoreResult<Arc<dyn StorageBackend>> {
    let backend: Arc<dyn StorageBackend> = match config.backend {
        BackendKind::Filesystem => Arc::new(FilesystemBackend::new(config)),
        BackendKind::ObjectStore => Arc::new(ObjectStoreBackend::from_config(config)?),
    };
    info!(backend = %config.backend, "storage backend ready");
    Ok(backend)
}
