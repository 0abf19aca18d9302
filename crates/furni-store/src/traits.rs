use async_trait::async_trait;

use crate::config::{BackendKind, ResourceCategory};
use crate::error::{StoreError, StoreResult};

/// Byte-level storage for catalog documents and assets.
///
/// All implementations must satisfy these invariants:
/// - Locations are `(category, name)` pairs resolved through the backend's
///   [`PathResolver`](crate::PathResolver); a misconfigured category fails
///   before any I/O is attempted.
/// - A missing object reads as [`StoreError::NotFound`]. Every other failure
///   is a backend failure and is not distinguished further.
/// - Writes replace the whole object. There are no partial writes.
/// - No operation retries.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> BackendKind;

    /// Human-readable location of `name`, for logs and diagnostics.
    fn locate(&self, category: ResourceCategory, name: &str) -> StoreResult<String>;

    /// Read the full content of an object.
    async fn read(&self, category: ResourceCategory, name: &str) -> StoreResult<Vec<u8>>;

    /// Store a text document, replacing any previous content.
    async fn write_text(&self, category: ResourceCategory, name: &str, text: &str)
        -> StoreResult<()>;

    /// Store a binary asset with its declared media type.
    async fn write_binary(
        &self,
        category: ResourceCategory,
        name: &str,
        data: &[u8],
        media_type: &str,
    ) -> StoreResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, category: ResourceCategory, name: &str) -> StoreResult<bool>;

    /// Read an object and decode it as UTF-8.
    async fn read_text(&self, category: ResourceCategory, name: &str) -> StoreResult<String> {
        let bytes = self.read(category, name).await?;
        String::from_utf8(bytes).map_err(|_| StoreError::InvalidText {
            category,
            name: name.to_string(),
        })
    }
}
