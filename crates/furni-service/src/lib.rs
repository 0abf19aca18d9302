//! Catalog storage service.
//!
//! Ties a [`StorageBackend`] to the item merge rules: reading catalog
//! documents, updating and adding items with a read-merge-write cycle, and
//! routing uploaded assets to the right category. This is the entry point for
//! the HTTP server and the CLI.

pub mod error;
pub mod locks;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use locks::FileLocks;
pub use service::StorageService;

// Re-export key types
pub use furni_merge::{CatalogMerger, IdGenerator};
pub use furni_store::{
    BackendKind, ObjectStoreConfig, ResourceCategory, StorageBackend, StorageConfig,
};
pub use furni_types::{Asset, AssetKind, CatalogDocument, Fields, Item, ItemCollection, ItemId};
