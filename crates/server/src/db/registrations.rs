//! Pending registration repository.

use mise_core::Email;

use super::{Collection, DocumentStore, StoreError, from_document};
use crate::models::PendingRegistration;

/// Repository for signups awaiting OTP verification.
pub struct RegistrationRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> RegistrationRepository<'a> {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Look up a pending registration by email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        let mut hits = self
            .store
            .find_by_field(Collection::Registrations, "email", email.as_str())
            .await?;

        hits.pop()
            .map(|doc| from_document(Collection::Registrations, doc))
            .transpose()
    }

    /// Insert or overwrite the pending registration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails.
    pub async fn save(&self, registration: &PendingRegistration) -> Result<(), StoreError> {
        let body = serde_json::to_value(registration)?;
        self.store
            .upsert(Collection::Registrations, &registration.id, body)
            .await
    }

    /// Delete the pending registration (on verification success).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no registration exists.
    /// Returns `StoreError::Database` if the delete fails.
    pub async fn delete(&self, email: &Email) -> Result<(), StoreError> {
        self.store
            .delete(Collection::Registrations, email.as_str())
            .await
    }
}
