//! Mapping of resource categories to concrete locations.
//!
//! A location is built from two parts: the base path or key prefix configured
//! for `(category, backend)`, and a logical name supplied by the caller
//! (`FurnitureData.json`, `chair_icon.png`). Logical names must stay inside
//! their base:
//! - Must be non-empty
//! - Must not be absolute or start with `/`
//! - Must not contain `\` or NUL
//! - No component may be `..` or empty (`a//b`)

use std::path::PathBuf;

use crate::config::{BackendKind, PathsConfig, ResourceCategory, StorageConfig};
use crate::error::{StoreError, StoreResult};

/// Resolves categories to configured base paths and builds locations under
/// them. Pure: no resolution step touches storage.
#[derive(Clone, Debug)]
pub struct PathResolver {
    paths: PathsConfig,
}

impl PathResolver {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            paths: config.paths.clone(),
        }
    }

    /// The configured base path or prefix for `category` under `backend`.
    ///
    /// An empty or whitespace-only entry is a configuration error; there is no
    /// fallback location.
    pub fn resolve(&self, category: ResourceCategory, backend: BackendKind) -> StoreResult<&str> {
        let configured = self.paths.get(category).get(backend).trim();
        if configured.is_empty() {
            return Err(StoreError::Configuration { category, backend });
        }
        Ok(configured)
    }

    /// Filesystem path of `name` under the category's base directory.
    pub fn filesystem_path(&self, category: ResourceCategory, name: &str) -> StoreResult<PathBuf> {
        let base = self.resolve(category, BackendKind::Filesystem)?;
        let name = normalize_name(name)?;
        Ok(PathBuf::from(base).join(name))
    }

    /// Object key `{prefix}/{name}` for the category.
    pub fn object_key(&self, category: ResourceCategory, name: &str) -> StoreResult<String> {
        let prefix = self.resolve(category, BackendKind::ObjectStore)?;
        let name = normalize_name(name)?;
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            // A prefix of "/" means the bucket root.
            return Ok(name);
        }
        Ok(format!("{prefix}/{name}"))
    }
}

/// Validate `name` and drop `.` components, so that every spelling of one
/// location (`F.json`, `./F.json`, `a/./F.json`) yields the same string.
pub fn normalize_name(name: &str) -> StoreResult<String> {
    validate_name(name)?;
    let parts: Vec<&str> = name.split('/').filter(|c| *c != ".").collect();
    if parts.is_empty() {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "name must refer to a file".to_string(),
        });
    }
    Ok(parts.join("/"))
}

/// Validate a caller-supplied logical name.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = |reason: &str| {
        Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name must not be empty");
    }
    if name.starts_with('/') || PathBuf::from(name).is_absolute() {
        return invalid("name must be relative");
    }
    if name.contains('\\') || name.contains('\0') {
        return invalid("contains a forbidden character");
    }
    for component in name.split('/') {
        if component.is_empty() {
            return invalid("contains an empty path component");
        }
        if component == ".." {
            return invalid("must not contain '..'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryPaths;

    fn resolver() -> PathResolver {
        let mut config = StorageConfig::default();
        config.paths.catalog = CategoryPaths::new("/srv/data", "furnidata/");
        config.paths.icons = CategoryPaths::new("/srv/icons", "");
        config.paths.furniture_assets = CategoryPaths::new("   ", "furniture");
        PathResolver::new(&config)
    }

    #[test]
    fn resolves_configured_paths() {
        let r = resolver();
        assert_eq!(
            r.resolve(ResourceCategory::Catalog, BackendKind::Filesystem).unwrap(),
            "/srv/data"
        );
        assert_eq!(
            r.resolve(ResourceCategory::FurnitureAssets, BackendKind::ObjectStore).unwrap(),
            "furniture"
        );
    }

    #[test]
    fn empty_path_is_configuration_error() {
        let r = resolver();
        let err = r
            .resolve(ResourceCategory::Icons, BackendKind::ObjectStore)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Configuration {
                category: ResourceCategory::Icons,
                backend: BackendKind::ObjectStore
            }
        ));
        assert_eq!(
            err.to_string(),
            "no icons path configured for the object-store backend"
        );
    }

    #[test]
    fn whitespace_path_is_configuration_error() {
        let r = resolver();
        assert!(matches!(
            r.resolve(ResourceCategory::FurnitureAssets, BackendKind::Filesystem),
            Err(StoreError::Configuration { .. })
        ));
        assert!(matches!(
            r.filesystem_path(ResourceCategory::FurnitureAssets, "chair.nitro"),
            Err(StoreError::Configuration { .. })
        ));
    }

    #[test]
    fn filesystem_path_joins_base_and_name() {
        let r = resolver();
        assert_eq!(
            r.filesystem_path(ResourceCategory::Catalog, "FurnitureData.json").unwrap(),
            PathBuf::from("/srv/data/FurnitureData.json")
        );
        assert_eq!(
            r.filesystem_path(ResourceCategory::Catalog, "nested/dir/f.json").unwrap(),
            PathBuf::from("/srv/data/nested/dir/f.json")
        );
    }

    #[test]
    fn object_key_does_not_double_separator() {
        let r = resolver();
        assert_eq!(
            r.object_key(ResourceCategory::Catalog, "FurnitureData.json").unwrap(),
            "furnidata/FurnitureData.json"
        );
        assert_eq!(
            r.object_key(ResourceCategory::FurnitureAssets, "chair.nitro").unwrap(),
            "furniture/chair.nitro"
        );
    }

    #[test]
    fn configuration_is_checked_before_name() {
        let r = resolver();
        assert!(matches!(
            r.object_key(ResourceCategory::Icons, "../escape"),
            Err(StoreError::Configuration { .. })
        ));
    }

    #[test]
    fn valid_names() {
        assert!(validate_name("FurnitureData.json").is_ok());
        assert!(validate_name("chair_icon.png").is_ok());
        assert!(validate_name("hotel/v2/FurnitureData.json").is_ok());
        assert!(validate_name("..hidden").is_ok());
    }

    #[test]
    fn invalid_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("/etc/passwd").is_err());
        assert!(validate_name("../FurnitureData.json").is_err());
        assert!(validate_name("a/../../b").is_err());
        assert!(validate_name("a//b").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("trailing/").is_err());
    }

    #[test]
    fn current_dir_components_are_dropped() {
        assert_eq!(normalize_name("./FurnitureData.json").unwrap(), "FurnitureData.json");
        assert_eq!(normalize_name("hotel/./v2/F.json").unwrap(), "hotel/v2/F.json");
        assert!(matches!(
            normalize_name("./."),
            Err(StoreError::InvalidName { .. })
        ));

        let r = resolver();
        assert_eq!(
            r.filesystem_path(ResourceCategory::Catalog, "./F.json").unwrap(),
            r.filesystem_path(ResourceCategory::Catalog, "F.json").unwrap()
        );
        assert_eq!(
            r.object_key(ResourceCategory::Catalog, "./F.json").unwrap(),
            "furnidata/F.json"
        );
    }
}
