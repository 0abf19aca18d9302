//! Storage backends for the furnidata catalog.
//!
//! Catalog documents and binary assets are stored through one capability
//! trait, [`StorageBackend`], with two variants:
//!
//! - [`FilesystemBackend`] -- per-category base directories on local disk
//! - [`ObjectStoreBackend`] -- `{prefix}/{name}` keys in an S3-compatible bucket
//!
//! Locations are built by [`PathResolver`] from the immutable
//! [`StorageConfig`]; [`build_backend`] picks the variant once at startup.
//!
//! # Design Rules
//!
//! 1. A category with no configured location fails loudly; there is no default path.
//! 2. Resolution happens before I/O, so a configuration error never touches storage.
//! 3. Writes replace whole objects. Filesystem writes are verified after the fact.
//! 4. Missing objects are `NotFound`; every other failure is a backend error.
//! 5. Nothing retries.

pub mod config;
pub mod error;
pub mod factory;
pub mod filesystem;
pub mod object;
pub mod resolver;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{
    BackendKind, CategoryPaths, ObjectStoreConfig, PathsConfig, ResourceCategory, StorageConfig,
};
pub use error::{StoreError, StoreResult};
pub use factory::build_backend;
pub use filesystem::FilesystemBackend;
pub use object::ObjectStoreBackend;
pub use resolver::{normalize_name, validate_name, PathResolver};
pub use traits::StorageBackend;
