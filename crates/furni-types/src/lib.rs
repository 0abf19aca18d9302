//! Foundation types for the furnidata catalog.
//!
//! Every other furni crate depends on `furni-types`. The types here are pure
//! in-memory structures; none of them perform I/O.
//!
//! # Key Types
//!
//! - [`Item`] — One catalog entry, a field map with a fixed default schema
//! - [`ItemId`] — Item identifier with loose numeric/string equality
//! - [`CatalogDocument`] — Root document holding `roomItems` and `wallItems`
//! - [`ItemCollection`] — Names one of the two item collections
//! - [`Asset`] / [`AssetKind`] — Uploaded binary content and its classification

pub mod asset;
pub mod catalog;
pub mod error;
pub mod item;

pub use asset::{Asset, AssetKind, FURNITURE_PACKAGE_SUFFIX, ICON_MEDIA_TYPE, ICON_SUFFIX};
pub use catalog::{CatalogDocument, ItemCollection, DEFAULT_CATALOG_FILENAME};
pub use error::TypeError;
pub use item::{Fields, Item, ItemId, ITEM_FIELDS};
