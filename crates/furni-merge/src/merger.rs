use furni_types::{CatalogDocument, Fields, Item, ItemCollection, ItemId};
use serde_json::Value;
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::id::IdGenerator;
use crate::overlay::overlay;

/// Applies updates and insertions to a catalog document in memory.
///
/// Precedence, lowest to highest:
/// - update: schema defaults, then the stored item, then the update payload
/// - add: schema defaults, then the supplied item data, then the generated id
///
/// Every item a merge returns therefore carries the full schema.
#[derive(Debug, Default)]
pub struct CatalogMerger {
    ids: IdGenerator,
}

impl CatalogMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific identifier source for added items.
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self { ids }
    }

    /// Merge `updates` into the first item whose id loosely equals `item_id`.
    ///
    /// `roomItems` is searched before `wallItems`; the first match is the only
    /// one touched.
    pub fn merge_update(
        &self,
        mut document: CatalogDocument,
        item_id: &ItemId,
        updates: &Fields,
    ) -> MergeResult<(CatalogDocument, Item)> {
        let (collection, index) = document
            .find(item_id)
            .ok_or_else(|| MergeError::ItemNotFound(item_id.clone()))?;

        let items = document
            .items_mut(collection)
            .ok_or_else(|| MergeError::ItemNotFound(item_id.clone()))?;
        let existing = match &items[index] {
            Value::Object(fields) => fields.clone(),
            _ => return Err(MergeError::ItemNotFound(item_id.clone())),
        };

        let defaults = Item::defaults();
        let merged = overlay([defaults.fields(), &existing, updates]);
        items[index] = merged.clone().into_value();

        debug!(
            %item_id,
            %collection,
            index,
            fields = updates.len(),
            "merged item update"
        );
        Ok((document, merged))
    }

    /// Append a new item built from `item_data` to the first existing
    /// collection.
    ///
    /// A collection is chosen by key presence alone: when `roomItems` exists,
    /// new items go there even if it is empty and `wallItems` exists too.
    /// Any `id` in `item_data` is replaced by a freshly generated one.
    pub fn merge_add(
        &self,
        mut document: CatalogDocument,
        item_data: &Fields,
    ) -> MergeResult<(CatalogDocument, Item)> {
        let collection = ItemCollection::ALL
            .into_iter()
            .find(|c| document.has_collection(*c))
            .ok_or(MergeError::NoTargetCollection)?;

        let mut forced = Fields::new();
        forced.insert("id".to_string(), Value::from(self.ids.next_id()));

        let defaults = Item::defaults();
        let item = overlay([defaults.fields(), item_data, &forced]);

        let items = document
            .items_mut(collection)
            .ok_or(MergeError::NoTargetCollection)?;
        items.push(item.clone().into_value());

        debug!(
            id = ?item.get("id"),
            %collection,
            len = items.len(),
            "appended new item"
        );
        Ok((document, item))
    }
}
