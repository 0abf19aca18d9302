use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use furni_store::StorageConfig;
use furni_types::DEFAULT_CATALOG_FILENAME;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable consulted when the config file has no access key.
pub const ACCESS_KEY_ENV: &str = "FURNI_S3_ACCESS_KEY_ID";
/// Environment variable consulted when the config file has no secret key.
pub const SECRET_KEY_ENV: &str = "FURNI_S3_SECRET_ACCESS_KEY";

const DEFAULT_PORT: u16 = 3123;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Catalog read by `GET /files` when no filename is given.
    pub default_filename: String,
    /// Upper bound on request bodies, uploads included.
    pub max_upload_bytes: usize,
    /// Answer cross-origin requests from browser-hosted editors.
    pub allow_cors: bool,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            default_filename: DEFAULT_CATALOG_FILENAME.to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            allow_cors: true,
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, then fill object-store credentials from the
    /// environment where the file leaves them out.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&text)?;
        config.fill_credentials(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Values already present in the file win over `lookup`.
    pub fn fill_credentials(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let Some(store) = self.storage.object_store.as_mut() else {
            return;
        };
        if store.access_key_id.is_none() {
            store.access_key_id = lookup(ACCESS_KEY_ENV);
        }
        if store.secret_access_key.is_none() {
            store.secret_access_key = lookup(SECRET_KEY_ENV);
        }
    }
}
