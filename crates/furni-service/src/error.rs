use furni_store::{BackendKind, ResourceCategory, StoreError};
use furni_types::{ItemId, TypeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no {category} path configured for the {backend} backend")]
    Configuration {
        category: ResourceCategory,
        backend: BackendKind,
    },

    #[error("file not found: {filename}")]
    NotFound { filename: String },

    #[error("item {item_id} not found in {filename}")]
    ItemNotFound { filename: String, item_id: ItemId },

    #[error("{filename} has no roomItems or wallItems collection to add into")]
    NoTargetCollection { filename: String },

    #[error("invalid asset {filename} ({media_type}): expected *_icon.png as image/png or *.nitro")]
    InvalidAsset { filename: String, media_type: String },

    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("could not serialize {filename}: {source}")]
    Serialization {
        filename: String,
        #[source]
        source: TypeError,
    },

    #[error("storage error on {name}: {source}")]
    Backend {
        name: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    /// Translate a store failure for the object called `name`.
    pub fn from_store(name: &str, err: StoreError) -> Self {
        match err {
            StoreError::Configuration { category, backend } => {
                Self::Configuration { category, backend }
            }
            StoreError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            StoreError::NotFound { .. } | StoreError::InvalidText { .. } => Self::NotFound {
                filename: name.to_string(),
            },
            other => Self::Backend {
                name: name.to_string(),
                source: other,
            },
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
