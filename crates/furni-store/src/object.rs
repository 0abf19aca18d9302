use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::{debug, info};

use crate::config::{BackendKind, ObjectStoreConfig, ResourceCategory, StorageConfig};
use crate::error::{StoreError, StoreResult};
use crate::resolver::PathResolver;
use crate::traits::StorageBackend;

const JSON_MEDIA_TYPE: &str = "application/json";

/// S3-compatible object store backend.
///
/// Wraps any [`ObjectStore`]: an S3/R2 client in production, or an in-memory
/// store for tests. Objects live at `{prefix}/{name}` where the prefix is the
/// category's configured object-store path.
#[derive(Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    resolver: PathResolver,
}

impl ObjectStoreBackend {
    /// Wrap an already-built store.
    pub fn new(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            resolver: PathResolver::new(config),
        }
    }

    /// Build an S3 client from the `object_store` section of the config.
    pub fn from_config(config: &StorageConfig) -> StoreResult<Self> {
        let settings = config.object_store.as_ref().ok_or_else(|| {
            StoreError::Client("object-store backend selected but no [object_store] settings".into())
        })?;
        let store = build_s3(settings)?;
        Ok(Self::new(store, config))
    }

    /// A backend over a fresh in-memory store.
    pub fn in_memory(config: &StorageConfig) -> Self {
        Self::new(Arc::new(InMemory::new()), config)
    }

    /// The underlying store, for inspection.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    fn key(&self, category: ResourceCategory, name: &str) -> StoreResult<ObjectPath> {
        let key = self.resolver.object_key(category, name)?;
        ObjectPath::parse(&key).map_err(|e| StoreError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    async fn put(&self, key: &ObjectPath, data: Bytes, media_type: &str) -> StoreResult<()> {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, media_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };
        let size = data.len();
        self.store
            .put_opts(key, PutPayload::from(data), opts)
            .await?;
        info!(key = %key, bytes = size, media_type, "object written");
        Ok(())
    }
}

fn build_s3(settings: &ObjectStoreConfig) -> StoreResult<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&settings.bucket)
        .with_region(&settings.region);

    if let Some(endpoint) = &settings.endpoint {
        // Path-style requests for R2 and MinIO endpoints.
        builder = builder
            .with_endpoint(endpoint)
            .with_virtual_hosted_style_request(false);
    }
    if settings.allow_http {
        builder = builder.with_allow_http(true);
    }
    if let Some(ak) = &settings.access_key_id {
        builder = builder.with_access_key_id(ak);
    }
    if let Some(sk) = &settings.secret_access_key {
        builder = builder.with_secret_access_key(sk);
    }

    let store = builder
        .build()
        .map_err(|e| StoreError::Client(format!("S3: {e}")))?;
    Ok(Arc::new(store))
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ObjectStore
    }

    fn locate(&self, category: ResourceCategory, name: &str) -> StoreResult<String> {
        Ok(self.key(category, name)?.to_string())
    }

    async fn read(&self, category: ResourceCategory, name: &str) -> StoreResult<Vec<u8>> {
        let key = self.key(category, name)?;
        debug!(key = %key, "fetching object");
        match self.store.get(&key).await {
            Ok(result) => Ok(result.bytes().await?.to_vec()),
            Err(object_store::Error::NotFound { .. }) => Err(StoreError::NotFound {
                category,
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_text(
        &self,
        category: ResourceCategory,
        name: &str,
        text: &str,
    ) -> StoreResult<()> {
        let key = self.key(category, name)?;
        self.put(&key, Bytes::copy_from_slice(text.as_bytes()), JSON_MEDIA_TYPE)
            .await
    }

    async fn write_binary(
        &self,
        category: ResourceCategory,
        name: &str,
        data: &[u8],
        media_type: &str,
    ) -> StoreResult<()> {
        let key = self.key(category, name)?;
        self.put(&key, Bytes::copy_from_slice(data), media_type).await
    }

    async fn exists(&self, category: ResourceCategory, name: &str) -> StoreResult<bool> {
        let key = self.key(category, name)?;
        match self.store.head(&key).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("store", &self.store.to_string())
            .finish()
    }
}
