use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which storage variant is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Local filesystem under per-category base directories.
    Filesystem,
    /// S3-compatible object store (AWS S3, Cloudflare R2, MinIO).
    #[serde(alias = "s3", alias = "r2")]
    ObjectStore,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filesystem => write!(f, "filesystem"),
            Self::ObjectStore => write!(f, "object-store"),
        }
    }
}

/// A named class of stored resources, each with its own configured location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceCategory {
    /// Catalog JSON documents.
    Catalog,
    /// PNG icon assets.
    Icons,
    /// Packaged furniture archives.
    FurnitureAssets,
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Icons => write!(f, "icons"),
            Self::FurnitureAssets => write!(f, "furniture-assets"),
        }
    }
}

/// The location of one category under each backend kind.
///
/// An empty string means "not configured" and is rejected at resolution time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPaths {
    #[serde(default)]
    pub filesystem: String,
    #[serde(default, alias = "s3", alias = "r2")]
    pub object_store: String,
}

impl CategoryPaths {
    pub fn new(filesystem: impl Into<String>, object_store: impl Into<String>) -> Self {
        Self {
            filesystem: filesystem.into(),
            object_store: object_store.into(),
        }
    }

    pub fn get(&self, kind: BackendKind) -> &str {
        match kind {
            BackendKind::Filesystem => &self.filesystem,
            BackendKind::ObjectStore => &self.object_store,
        }
    }
}

/// Per-category locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub catalog: CategoryPaths,
    #[serde(default)]
    pub icons: CategoryPaths,
    #[serde(default)]
    pub furniture_assets: CategoryPaths,
}

impl PathsConfig {
    pub fn get(&self, category: ResourceCategory) -> &CategoryPaths {
        match category {
            ResourceCategory::Catalog => &self.catalog,
            ResourceCategory::Icons => &self.icons,
            ResourceCategory::FurnitureAssets => &self.furniture_assets,
        }
    }
}

/// Connection settings for an S3-compatible object store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    /// Custom endpoint for S3-compatible services (R2, MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Permit plain-HTTP endpoints (local MinIO).
    #[serde(default)]
    pub allow_http: bool,
}

fn default_region() -> String {
    "auto".to_string()
}

impl ObjectStoreConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: None,
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            allow_http: false,
        }
    }
}

impl fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("allow_http", &self.allow_http)
            .finish()
    }
}

/// Storage settings, fixed for the life of the process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: BackendKind,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub object_store: Option<ObjectStoreConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Filesystem,
            paths: PathsConfig {
                catalog: CategoryPaths::new("./data", ""),
                icons: CategoryPaths::new("./icons", ""),
                furniture_assets: CategoryPaths::new("./furniture", ""),
            },
            object_store: None,
        }
    }
}

impl StorageConfig {
    /// Filesystem deployment with every category under one root directory.
    pub fn filesystem_under(root: &Path) -> Self {
        let sub = |name: &str| root.join(name).to_string_lossy().into_owned();
        Self {
            backend: BackendKind::Filesystem,
            paths: PathsConfig {
                catalog: CategoryPaths::new(sub("data"), ""),
                icons: CategoryPaths::new(sub("icons"), ""),
                furniture_assets: CategoryPaths::new(sub("furniture"), ""),
            },
            object_store: None,
        }
    }

    /// Object-store deployment using the conventional `data`, `icons` and
    /// `furniture` prefixes.
    pub fn object_store(store: ObjectStoreConfig) -> Self {
        Self {
            backend: BackendKind::ObjectStore,
            paths: PathsConfig {
                catalog: CategoryPaths::new("", "data"),
                icons: CategoryPaths::new("", "icons"),
                furniture_assets: CategoryPaths::new("", "furniture"),
            },
            object_store: Some(store),
        }
    }
}
