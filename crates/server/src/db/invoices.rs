//! Invoice document repository (read-only).
//!
//! Invoice documents are produced entirely by the ingestion pipeline and
//! carry free-form line items, so they stay untyped here; the invoices
//! route projects them with per-field defaults.

use mise_core::Email;
use serde_json::Value;

use super::{Collection, DocumentStore, StoreError};

/// Read-only repository for per-user invoice documents.
pub struct InvoiceRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> InvoiceRepository<'a> {
    /// Create a new invoice repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Find the user's invoice document by its embedded `userId`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get_by_user(&self, email: &Email) -> Result<Option<Value>, StoreError> {
        let mut hits = self
            .store
            .find_by_field(Collection::Invoices, "userId", email.as_str())
            .await?;
        Ok(hits.pop())
    }
}
