// Catalog arena entities

use serde::Serialize;

use crate::entities::Item;
use crate::value_objects::ItemKey;

/// An item as held by the in-memory catalog, addressed by a stable key.
/// Serializes as the item's fields plus `key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub key: ItemKey,
    #[serde(flatten)]
    pub item: Item,
}

impl CatalogEntry {
    pub fn new(item: Item) -> Self {
        Self {
            key: ItemKey::generate(),
            item,
        }
    }
}

/// Point-in-time copy of the catalog. `version` increases on every
/// successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub version: u64,
    pub updated_at_ms: i64,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    pub fn items(&self) -> Vec<Item> {
        self.entries.iter().map(|entry| entry.item.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_key_beside_item_fields() {
        let entry = CatalogEntry::new(Item::new("bread", "Bread"));
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["key"], serde_json::json!(entry.key.to_string()));
        assert_eq!(value["name"], "bread");
        assert_eq!(value["label"], "Bread");
        assert!(value.get("item").is_none());
    }
}
