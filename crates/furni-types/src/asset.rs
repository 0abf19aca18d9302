use std::fmt;

use serde::{Deserialize, Serialize};

/// Filename suffix every icon must carry.
pub const ICON_SUFFIX: &str = "_icon.png";
/// The only media type accepted for icons.
pub const ICON_MEDIA_TYPE: &str = "image/png";
/// Filename suffix of a packaged furniture archive.
pub const FURNITURE_PACKAGE_SUFFIX: &str = ".nitro";

/// Classification of an uploaded asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    /// A PNG catalog icon (`*_icon.png`, `image/png`).
    Icon,
    /// A packaged furniture archive (`*.nitro`).
    FurniturePackage,
}

impl AssetKind {
    /// Classify by original filename and declared media type.
    ///
    /// Icons are checked first. A `.nitro` name classifies as a furniture
    /// package regardless of media type.
    pub fn classify(filename: &str, media_type: &str) -> Option<Self> {
        if media_essence(media_type) == ICON_MEDIA_TYPE && filename.ends_with(ICON_SUFFIX) {
            Some(Self::Icon)
        } else if filename.ends_with(FURNITURE_PACKAGE_SUFFIX) {
            Some(Self::FurniturePackage)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::FurniturePackage => "furniture-package",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `image/PNG; charset=binary` -> `image/png`
fn media_essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// An uploaded binary blob with its original name and declared media type.
#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    pub filename: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl Asset {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            data,
        }
    }

    pub fn kind(&self) -> Option<AssetKind> {
        AssetKind::classify(&self.filename, &self.media_type)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("filename", &self.filename)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}
