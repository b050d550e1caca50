//! Inventory aggregate repository.

use mise_core::Email;

use super::{Collection, DocumentStore, StoreError, from_document};
use crate::models::InventoryAggregate;

/// Repository for per-user inventory documents.
pub struct InventoryRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Load the user's aggregate, synthesizing an empty one if no document
    /// exists yet. The synthesized aggregate is not persisted until a
    /// mutation is saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the read fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn load_or_default(&self, email: &Email) -> Result<InventoryAggregate, StoreError> {
        Ok(self
            .load(email)
            .await?
            .unwrap_or_else(|| InventoryAggregate::empty(email)))
    }

    /// Load the user's aggregate, or `None` if no document was ever written.
    ///
    /// Update and delete distinguish "no document at all" from "item not in
    /// the document", so they need the unsynthesized read.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the read fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn load(&self, email: &Email) -> Result<Option<InventoryAggregate>, StoreError> {
        let doc = self.store.read(Collection::Inventory, email.as_str()).await?;
        doc.map(|doc| from_document(Collection::Inventory, doc))
            .transpose()
    }

    /// Persist the full aggregate document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails.
    pub async fn save(&self, aggregate: &InventoryAggregate) -> Result<(), StoreError> {
        let body = serde_json::to_value(aggregate)?;
        self.store
            .upsert(Collection::Inventory, &aggregate.id, body)
            .await
    }
}
