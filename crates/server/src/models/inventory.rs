//! Per-user inventory aggregates.
//!
//! One document per user holds every inventory item in insertion order.
//! Items arrive from two writers: this API (add/update/delete) and the
//! invoice-ingestion pipeline, which attaches extra pricing fields and an
//! "Item Number". Unrecognized fields ride along in `extra` so a mutation
//! through this API never strips what the pipeline wrote.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use chrono::{DateTime, Utc};
use mise_core::Email;

use super::{de, iso_timestamp};

/// Mutations that can fail on an aggregate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    /// No item in the collection matches the given key.
    #[error("inventory item not found")]
    ItemNotFound,
}

/// The single inventory document for one user, id = email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryAggregate {
    /// Document id (always equals the email).
    pub id: String,
    /// Owning user (same email, kept for equality queries).
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Items in insertion order. Order is the batch order.
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    /// When the document was last mutated through this API.
    #[serde(default, deserialize_with = "de::optional_string")]
    pub last_updated: Option<String>,
    /// Item count, recomputed on delete. Absent until the first delete.
    #[serde(rename = "itemCount", default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    /// Fields written by other pipelines (supplier_name, timestamp, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One inventory item.
///
/// Every field defaults on read so a document written by an older pipeline
/// version still loads; the projection layer fills gaps with empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "Inventory Item Name", default)]
    pub name: String,
    #[serde(rename = "Item Type", default)]
    pub item_type: String,
    #[serde(rename = "Nutritional Label", default)]
    pub nutritional_label: String,
    #[serde(rename = "UPC", default)]
    pub upc: String,
    /// "Yes" or "No".
    #[serde(rename = "Active", default = "default_active")]
    pub active: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Inventory Count By", default)]
    pub count_by: String,
    #[serde(rename = "Inventory Unit of Measure", default)]
    pub unit_of_measure: String,
    #[serde(rename = "Locations", default)]
    pub locations: Vec<Location>,
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
    /// When the item was appended or last overwritten.
    #[serde(default)]
    pub timestamp: String,
    /// 1-based ordinal assigned at append time, never reassigned. Not unique
    /// after deletions: it derives from the list length at append time.
    #[serde(rename = "batchNumber", default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<u64>,
    /// Key used by update/delete. Only present on invoice-ingested items.
    #[serde(
        rename = "Item Number",
        default,
        deserialize_with = "de::stringlike",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_number: Option<String>,
    /// Invoice-derived fields (Brand, Case Price, ...) preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_active() -> String {
    "Yes".to_owned()
}

/// A storage location for an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_location_status")]
    pub status: String,
}

fn default_location_status() -> String {
    "active".to_owned()
}

/// Validated fields for an item create or overwrite.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub name: String,
    pub item_type: String,
    pub nutritional_label: Option<String>,
    pub upc: Option<String>,
    pub active: bool,
    pub category: String,
    pub count_by: String,
    pub unit_of_measure: Option<String>,
    pub locations: Vec<Location>,
    pub image: Option<String>,
}

impl InventoryAggregate {
    /// Synthesize the empty aggregate for a user with no document yet.
    /// Not persisted until a mutation lands.
    #[must_use]
    pub fn empty(email: &Email) -> Self {
        Self {
            id: email.as_str().to_owned(),
            user_id: email.as_str().to_owned(),
            items: Vec::new(),
            last_updated: None,
            item_count: None,
            extra: Map::new(),
        }
    }

    /// Append a new item, assigning `batchNumber` = current item count + 1.
    ///
    /// Returns a copy of the stored item for the response body.
    pub fn append(&mut self, draft: NewInventoryItem, now: DateTime<Utc>) -> InventoryItem {
        let batch_number = self.items.len() as u64 + 1;
        let item = InventoryItem {
            name: draft.name,
            item_type: draft.item_type,
            nutritional_label: draft.nutritional_label.unwrap_or_default(),
            upc: draft.upc.unwrap_or_default(),
            active: active_flag(draft.active),
            category: draft.category,
            count_by: draft.count_by,
            unit_of_measure: draft.unit_of_measure.unwrap_or_default(),
            locations: draft.locations,
            image: draft.image,
            timestamp: iso_timestamp(now),
            batch_number: Some(batch_number),
            item_number: None,
            extra: Map::new(),
        };
        self.items.push(item.clone());
        self.last_updated = Some(iso_timestamp(now));
        item
    }

    /// Overwrite the first item whose "Item Number" equals `item_number`.
    ///
    /// The item keeps its position, its `batchNumber`, and any
    /// invoice-derived fields; everything this API owns is replaced.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::ItemNotFound` if no item matches.
    pub fn update(
        &mut self,
        item_number: &str,
        draft: NewInventoryItem,
        now: DateTime<Utc>,
    ) -> Result<InventoryItem, MutationError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.item_number.as_deref() == Some(item_number))
            .ok_or(MutationError::ItemNotFound)?;

        item.name = draft.name;
        item.item_type = draft.item_type;
        item.nutritional_label = draft.nutritional_label.unwrap_or_default();
        item.upc = draft.upc.unwrap_or_default();
        item.active = active_flag(draft.active);
        item.category = draft.category;
        item.count_by = draft.count_by;
        item.unit_of_measure = draft.unit_of_measure.unwrap_or_default();
        item.locations = draft.locations;
        item.image = draft.image;
        item.timestamp = iso_timestamp(now);

        let updated = item.clone();
        self.last_updated = Some(iso_timestamp(now));
        Ok(updated)
    }

    /// Drop every item whose "Item Number" equals `item_number` and
    /// recompute `itemCount`. Surviving items keep their `batchNumber`.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::ItemNotFound` if nothing was dropped.
    pub fn remove(&mut self, item_number: &str) -> Result<usize, MutationError> {
        let before = self.items.len();
        self.items
            .retain(|item| item.item_number.as_deref() != Some(item_number));

        if self.items.len() == before {
            return Err(MutationError::ItemNotFound);
        }

        self.item_count = Some(self.items.len());
        Ok(self.items.len())
    }

    /// Case-insensitive exact lookup by item name, used to enrich recipe
    /// ingredients with inventory metadata.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&InventoryItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }
}

fn active_flag(active: bool) -> String {
    if active { "Yes".to_owned() } else { "No".to_owned() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn email() -> Email {
        Email::parse("chef@example.com").unwrap()
    }

    fn draft(name: &str) -> NewInventoryItem {
        NewInventoryItem {
            name: name.to_owned(),
            item_type: "Produce".to_owned(),
            nutritional_label: None,
            upc: None,
            active: true,
            category: "Vegetables".to_owned(),
            count_by: "Case".to_owned(),
            unit_of_measure: None,
            locations: vec![],
            image: None,
        }
    }

    /// Give an item the "Item Number" key the ingestion pipeline would set.
    fn set_item_number(aggregate: &mut InventoryAggregate, index: usize, number: &str) {
        let item = aggregate.items.get_mut(index).unwrap();
        item.item_number = Some(number.to_owned());
    }

    #[test]
    fn test_append_assigns_sequential_batch_numbers() {
        let mut aggregate = InventoryAggregate::empty(&email());
        let now = Utc::now();
        for i in 1..=5 {
            let item = aggregate.append(draft(&format!("item-{i}")), now);
            assert_eq!(item.batch_number, Some(i));
        }
        let numbers: Vec<_> = aggregate.items.iter().map(|i| i.batch_number).collect();
        assert_eq!(
            numbers,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn test_append_defaults_optional_fields_to_empty() {
        let mut aggregate = InventoryAggregate::empty(&email());
        let item = aggregate.append(draft("tomatoes"), Utc::now());
        assert_eq!(item.nutritional_label, "");
        assert_eq!(item.upc, "");
        assert_eq!(item.unit_of_measure, "");
        assert_eq!(item.active, "Yes");
        assert!(item.image.is_none());
    }

    #[test]
    fn test_remove_keeps_surviving_batch_numbers() {
        let mut aggregate = InventoryAggregate::empty(&email());
        let now = Utc::now();
        for i in 1..=3 {
            aggregate.append(draft(&format!("item-{i}")), now);
        }
        set_item_number(&mut aggregate, 1, "A-100");

        let count = aggregate.remove("A-100").unwrap();
        assert_eq!(count, 2);
        assert_eq!(aggregate.item_count, Some(2));

        // Survivors keep their original batch numbers - no renumbering.
        let numbers: Vec<_> = aggregate.items.iter().map(|i| i.batch_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_batch_numbers_can_repeat_after_delete() {
        let mut aggregate = InventoryAggregate::empty(&email());
        let now = Utc::now();
        aggregate.append(draft("first"), now);
        aggregate.append(draft("second"), now);
        set_item_number(&mut aggregate, 0, "A-1");
        aggregate.remove("A-1").unwrap();

        // One item left with batchNumber 2; the next append reuses 2.
        let item = aggregate.append(draft("third"), now);
        assert_eq!(item.batch_number, Some(2));
    }

    #[test]
    fn test_remove_unknown_key_fails() {
        let mut aggregate = InventoryAggregate::empty(&email());
        aggregate.append(draft("only"), Utc::now());
        assert_eq!(
            aggregate.remove("missing").unwrap_err(),
            MutationError::ItemNotFound
        );
        assert_eq!(aggregate.items.len(), 1);
        // itemCount is only recomputed by a successful delete.
        assert!(aggregate.item_count.is_none());
    }

    #[test]
    fn test_update_preserves_position_batch_number_and_extra() {
        let mut aggregate = InventoryAggregate::empty(&email());
        let now = Utc::now();
        for i in 1..=3 {
            aggregate.append(draft(&format!("item-{i}")), now);
        }
        set_item_number(&mut aggregate, 1, "B-200");
        aggregate
            .items
            .get_mut(1)
            .unwrap()
            .extra
            .insert("Brand".to_owned(), json!("Acme"));

        let mut replacement = draft("renamed");
        replacement.upc = Some("012345".to_owned());
        let updated = aggregate.update("B-200", replacement, now).unwrap();

        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.upc, "012345");
        assert_eq!(updated.batch_number, Some(2));
        assert_eq!(updated.extra.get("Brand"), Some(&json!("Acme")));
        // Position unchanged.
        assert_eq!(aggregate.items[1].name, "renamed");
    }

    #[test]
    fn test_update_unknown_key_fails() {
        let mut aggregate = InventoryAggregate::empty(&email());
        aggregate.append(draft("only"), Utc::now());
        let err = aggregate.update("missing", draft("x"), Utc::now()).unwrap_err();
        assert_eq!(err, MutationError::ItemNotFound);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let mut aggregate = InventoryAggregate::empty(&email());
        aggregate.append(draft("Roma Tomatoes"), Utc::now());
        assert!(aggregate.find_by_name("roma tomatoes").is_some());
        assert!(aggregate.find_by_name("ROMA TOMATOES").is_some());
        assert!(aggregate.find_by_name("roma").is_none());
    }

    #[test]
    fn test_numeric_item_number_deserializes_as_string() {
        let doc = json!({
            "id": "chef@example.com",
            "userId": "chef@example.com",
            "items": [{
                "Inventory Item Name": "Flour",
                "Item Number": 4711,
                "Case Price": "18.40"
            }]
        });
        let aggregate: InventoryAggregate = serde_json::from_value(doc).unwrap();
        assert_eq!(aggregate.items[0].item_number.as_deref(), Some("4711"));
        // Pipeline fields land in extra.
        assert_eq!(
            aggregate.items[0].extra.get("Case Price"),
            Some(&json!("18.40"))
        );
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let doc = json!({
            "id": "chef@example.com",
            "userId": "chef@example.com",
            "supplier_name": "US Foods",
            "items": [{
                "Inventory Item Name": "Flour",
                "Item Number": "F-1",
                "Brand": "Acme"
            }]
        });
        let aggregate: InventoryAggregate = serde_json::from_value(doc).unwrap();
        let back = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(back["supplier_name"], "US Foods");
        assert_eq!(back["items"][0]["Brand"], "Acme");
        assert_eq!(back["items"][0]["Item Number"], "F-1");
    }
}
