use crate::config::{BackendKind, ResourceCategory};

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No usable location is configured for the category under the backend.
    #[error("no {category} path configured for the {backend} backend")]
    Configuration {
        category: ResourceCategory,
        backend: BackendKind,
    },

    /// The logical name cannot be turned into a location under the base path.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The requested document or asset does not exist.
    #[error("{category} object not found: {name}")]
    NotFound {
        category: ResourceCategory,
        name: String,
    },

    /// Stored content is not valid UTF-8 text.
    #[error("{category} object {name} is not valid UTF-8")]
    InvalidText {
        category: ResourceCategory,
        name: String,
    },

    /// Bytes were written but the target could not be confirmed afterwards.
    #[error("write to {path} could not be verified")]
    WriteNotVerified { path: String },

    /// I/O error from the local filesystem.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport, auth or service error from the object store.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// The object store client could not be constructed.
    #[error("object store client: {0}")]
    Client(String),
}

impl StoreError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Returns `true` for a missing document or asset.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
