use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;
use crate::item::{Item, ItemId};

/// Catalog filename used when a caller does not name one.
pub const DEFAULT_CATALOG_FILENAME: &str = "FurnitureData.json";

/// One of the two item collections of a catalog document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCollection {
    /// Floor-placed furniture (`roomItems`).
    Room,
    /// Wall-mounted furniture (`wallItems`).
    Wall,
}

impl ItemCollection {
    /// Scan order used by lookups and by the add-target selection.
    pub const ALL: [ItemCollection; 2] = [ItemCollection::Room, ItemCollection::Wall];

    /// The document key holding this collection.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Room => "roomItems",
            Self::Wall => "wallItems",
        }
    }
}

impl fmt::Display for ItemCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The root catalog document.
///
/// Holds the `roomItems` and `wallItems` arrays plus whatever other top-level
/// keys the stored document carries. Key order and item order are preserved
/// exactly as read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogDocument(Map<String, Value>);

impl CatalogDocument {
    /// A document with no keys at all.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// A document with both collections present and empty.
    pub fn with_empty_collections() -> Self {
        let mut doc = Self::new();
        for collection in ItemCollection::ALL {
            doc.0
                .insert(collection.key().to_string(), Value::Array(Vec::new()));
        }
        doc
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(TypeError::NotAnObject("catalog document")),
        }
    }

    /// Parse a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))?;
        Self::from_value(value)
    }

    /// Render as JSON with two-space indentation, the persisted format.
    pub fn to_pretty_json(&self) -> Result<String, TypeError> {
        serde_json::to_string_pretty(&self.0).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns `true` if the collection key exists and holds an array.
    pub fn has_collection(&self, collection: ItemCollection) -> bool {
        matches!(self.0.get(collection.key()), Some(Value::Array(_)))
    }

    /// Items of a collection, or `None` when the collection is absent.
    pub fn items(&self, collection: ItemCollection) -> Option<&Vec<Value>> {
        match self.0.get(collection.key()) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn items_mut(&mut self, collection: ItemCollection) -> Option<&mut Vec<Value>> {
        match self.0.get_mut(collection.key()) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Replace (or create) a collection with the given items.
    pub fn set_collection(&mut self, collection: ItemCollection, items: Vec<Item>) {
        let values = items.into_iter().map(Item::into_value).collect();
        self.0
            .insert(collection.key().to_string(), Value::Array(values));
    }

    /// Remove a collection key entirely.
    pub fn remove_collection(&mut self, collection: ItemCollection) -> Option<Value> {
        self.0.shift_remove(collection.key())
    }

    /// Number of entries in a collection (zero when absent).
    pub fn len(&self, collection: ItemCollection) -> usize {
        self.items(collection).map_or(0, Vec::len)
    }

    /// Locate the first item whose `id` loosely equals `id`.
    ///
    /// Collections are scanned in [`ItemCollection::ALL`] order and the first
    /// hit wins. Entries that are not objects never match.
    pub fn find(&self, id: &ItemId) -> Option<(ItemCollection, usize)> {
        ItemCollection::ALL.into_iter().find_map(|collection| {
            self.items(collection)?
                .iter()
                .position(|entry| {
                    entry
                        .as_object()
                        .and_then(|fields| fields.get("id"))
                        .is_some_and(|stored| id.matches(stored))
                })
                .map(|index| (collection, index))
        })
    }

    /// Fetch the item at a position, if that entry is an object.
    pub fn item_at(&self, collection: ItemCollection, index: usize) -> Option<Item> {
        let entry = self.items(collection)?.get(index)?;
        Item::from_value(entry.clone()).ok()
    }
}
