//! User account repository.

use mise_core::Email;

use super::{Collection, DocumentStore, StoreError, from_document};
use crate::models::UserAccount;

/// Repository for verified user accounts.
pub struct UserRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<UserAccount>, StoreError> {
        let mut hits = self
            .store
            .find_by_field(Collection::Users, "email", email.as_str())
            .await?;

        hits.pop()
            .map(|doc| from_document(Collection::Users, doc))
            .transpose()
    }

    /// Check whether an account exists for this email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn exists(&self, email: &Email) -> Result<bool, StoreError> {
        let hits = self
            .store
            .find_by_field(Collection::Users, "email", email.as_str())
            .await?;
        Ok(!hits.is_empty())
    }

    /// Create a new account, failing if one already exists for this email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    /// Returns `StoreError::Database` if the write fails.
    pub async fn create(&self, user: &UserAccount) -> Result<(), StoreError> {
        let body = serde_json::to_value(user)?;
        self.store.create(Collection::Users, &user.id, body).await
    }

    /// Persist the full account document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the write fails.
    pub async fn save(&self, user: &UserAccount) -> Result<(), StoreError> {
        let body = serde_json::to_value(user)?;
        self.store.upsert(Collection::Users, &user.id, body).await
    }
}
