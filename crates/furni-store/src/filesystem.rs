use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{BackendKind, ResourceCategory, StorageConfig};
use crate::error::{StoreError, StoreResult};
use crate::resolver::PathResolver;
use crate::traits::StorageBackend;

/// Distinguishes concurrent temporary files for the same target.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Local filesystem backend.
///
/// Each category maps to a base directory. Writes go to a sibling temporary
/// file which is then renamed over the target, so readers observe either the
/// old content or the new content, never a truncated file. After the rename
/// the target is checked for existence; a write that cannot be confirmed is
/// reported as failed.
#[derive(Clone, Debug)]
pub struct FilesystemBackend {
    resolver: PathResolver,
}

impl FilesystemBackend {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            resolver: PathResolver::new(config),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    async fn write_bytes(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = temp_sibling(path);
        if let Err(e) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(&tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(path, e));
        }

        match tokio::fs::try_exists(path).await {
            Ok(true) => {
                info!(path = %path.display(), bytes = data.len(), "file written");
                Ok(())
            }
            Ok(false) => {
                warn!(path = %path.display(), "written file is missing");
                Err(StoreError::WriteNotVerified {
                    path: path.display().to_string(),
                })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to verify written file");
                Err(StoreError::WriteNotVerified {
                    path: path.display().to_string(),
                })
            }
        }
    }
}

/// `dir/FurnitureData.json` -> `dir/.FurnitureData.json.<pid>.<n>.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{file_name}.{}.{n}.tmp", std::process::id()))
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Filesystem
    }

    fn locate(&self, category: ResourceCategory, name: &str) -> StoreResult<String> {
        let path = self.resolver.filesystem_path(category, name)?;
        Ok(path.display().to_string())
    }

    async fn read(&self, category: ResourceCategory, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolver.filesystem_path(category, name)?;
        debug!(path = %path.display(), "reading file");
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                category,
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    async fn write_text(
        &self,
        category: ResourceCategory,
        name: &str,
        text: &str,
    ) -> StoreResult<()> {
        let path = self.resolver.filesystem_path(category, name)?;
        self.write_bytes(&path, text.as_bytes()).await
    }

    async fn write_binary(
        &self,
        category: ResourceCategory,
        name: &str,
        data: &[u8],
        media_type: &str,
    ) -> StoreResult<()> {
        let path = self.resolver.filesystem_path(category, name)?;
        debug!(path = %path.display(), media_type, "writing asset");
        self.write_bytes(&path, data).await
    }

    async fn exists(&self, category: ResourceCategory, name: &str) -> StoreResult<bool> {
        let path = self.resolver.filesystem_path(category, name)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryPaths;

    fn backend(root: &Path) -> FilesystemBackend {
        FilesystemBackend::new(&StorageConfig::filesystem_under(root))
    }

    #[tokio::test]
    async fn write_then_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        fs.write_text(ResourceCategory::Catalog, "FurnitureData.json", "{\"roomItems\":[]}")
            .await
            .unwrap();
        let text = fs
            .read_text(ResourceCategory::Catalog, "FurnitureData.json")
            .await
            .unwrap();
        assert_eq!(text, "{\"roomItems\":[]}");
        assert!(dir.path().join("data/FurnitureData.json").is_file());
    }

    #[tokio::test]
    async fn write_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        fs.write_text(ResourceCategory::Catalog, "hotel/v2/FurnitureData.json", "{}")
            .await
            .unwrap();
        assert!(dir.path().join("data/hotel/v2/FurnitureData.json").is_file());
        // Directory creation is idempotent.
        fs.write_text(ResourceCategory::Catalog, "hotel/v2/FurnitureData.json", "{}")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn overwrite_replaces_content_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        fs.write_text(ResourceCategory::Catalog, "f.json", "first version, longer")
            .await
            .unwrap();
        fs.write_text(ResourceCategory::Catalog, "f.json", "second")
            .await
            .unwrap();
        let text = fs.read_text(ResourceCategory::Catalog, "f.json").await.unwrap();
        assert_eq!(text, "second");

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        let err = fs
            .read(ResourceCategory::Catalog, "missing.json")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!fs.exists(ResourceCategory::Catalog, "missing.json").await.unwrap());
    }

    #[tokio::test]
    async fn binary_write_lands_in_category_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        let png = [0x89, b'P', b'N', b'G'];
        fs.write_binary(ResourceCategory::Icons, "chair_icon.png", &png, "image/png")
            .await
            .unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("icons/chair_icon.png")).unwrap(),
            png
        );
        assert!(fs.exists(ResourceCategory::Icons, "chair_icon.png").await.unwrap());
    }

    #[tokio::test]
    async fn unconfigured_category_fails_without_io() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::filesystem_under(dir.path());
        config.paths.icons = CategoryPaths::new("", "icons");
        let fs = FilesystemBackend::new(&config);

        let err = fs
            .write_binary(ResourceCategory::Icons, "chair_icon.png", b"x", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Configuration { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        let err = fs
            .write_text(ResourceCategory::Catalog, "../outside.json", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
        assert!(!dir.path().join("outside.json").exists());
    }

    #[tokio::test]
    async fn invalid_utf8_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        fs.write_binary(ResourceCategory::Catalog, "bad.json", &[0xff, 0xfe], "application/json")
            .await
            .unwrap();
        let err = fs
            .read_text(ResourceCategory::Catalog, "bad.json")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidText { .. }));
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = backend(dir.path());
        // A directory squatting on the target makes the rename fail.
        std::fs::create_dir_all(dir.path().join("data/taken.json/inner")).unwrap();
        let err = fs
            .write_text(ResourceCategory::Catalog, "taken.json", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[test]
    fn temp_siblings_are_unique_and_hidden() {
        let a = temp_sibling(Path::new("/d/f.json"));
        let b = temp_sibling(Path::new("/d/f.json"));
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/d")));
        assert!(a.file_name().unwrap().to_string_lossy().starts_with(".f.json."));
    }

    #[test]
    fn locate_reports_full_path() {
        let fs = backend(Path::new("/srv"));
        assert_eq!(
            fs.locate(ResourceCategory::Catalog, "FurnitureData.json").unwrap(),
            Path::new("/srv/data/FurnitureData.json").display().to_string()
        );
        assert_eq!(fs.kind(), BackendKind::Filesystem);
    }
}
