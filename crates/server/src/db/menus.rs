//! Menu and recipe document repositories.
//!
//! Both collections hold the same document shape ([`MenuAggregate`]); menus
//! are written by this API, recipes only by the invoice pipeline, so the
//! recipe repository is read-only here.

use mise_core::Email;

use super::{Collection, DocumentStore, StoreError, from_document};
use crate::models::MenuAggregate;

/// Repository for per-user menu documents.
pub struct MenuRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Load the user's menu document, synthesizing an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the read fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn load_or_default(&self, email: &Email) -> Result<MenuAggregate, StoreError> {
        Ok(self
            .load(email)
            .await?
            .unwrap_or_else(|| MenuAggregate::empty(email)))
    }

    /// Load the user's menu document, or `None` if none was ever written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the read fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn load(&self, email: &Email) -> Result<Option<MenuAggregate>, StoreError> {
        let doc = self.store.read(Collection::Menus, email.as_str()).await?;
        doc.map(|doc| from_document(Collection::Menus, doc))
            .transpose()
    }

    /// Persist the full menu document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails.
    pub async fn save(&self, aggregate: &MenuAggregate) -> Result<(), StoreError> {
        let body = serde_json::to_value(aggregate)?;
        self.store
            .upsert(Collection::Menus, &aggregate.id, body)
            .await
    }
}

/// Read-only repository for per-user recipe documents.
pub struct RecipeRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Load the user's recipe document, or `None` if the pipeline never
    /// wrote one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the read fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn load(&self, email: &Email) -> Result<Option<MenuAggregate>, StoreError> {
        let doc = self.store.read(Collection::Recipes, email.as_str()).await?;
        doc.map(|doc| from_document(Collection::Recipes, doc))
            .transpose()
    }
}
