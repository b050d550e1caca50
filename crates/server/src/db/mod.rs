//! Persistence layer: the document store and per-domain repositories.
//!
//! All of a user's records for one domain live in a single denormalized JSON
//! document keyed by the user's email address. The [`DocumentStore`] trait
//! captures exactly what the handlers need from the backing store:
//!
//! - atomic point read / upsert / create-if-absent / delete by id
//! - a simple equality query on one embedded field
//!
//! Backends:
//!
//! - [`postgres::PgDocumentStore`] - production, one JSONB table
//! - [`memory::MemoryStore`] - unit tests and local experiments
//!
//! Repositories (`users`, `registrations`, `inventory`, `menus`, `invoices`)
//! wrap the store with typed load/save operations per collection. Consistency
//! between a load and the following save is last-write-wins: there is no
//! version precondition on writes, so two concurrent mutations of the same
//! document can lose one writer's change.

pub mod inventory;
pub mod invoices;
pub mod memory;
pub mod menus;
pub mod postgres;
pub mod registrations;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use inventory::InventoryRepository;
pub use invoices::InvoiceRepository;
pub use memory::MemoryStore;
pub use menus::{MenuRepository, RecipeRepository};
pub use postgres::PgDocumentStore;
pub use registrations::RegistrationRepository;
pub use users::UserRepository;

/// Errors that can occur during store and repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document does not match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A document failed to serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Create-if-absent hit an existing document.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// The document collections this service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Verified user accounts, id = email.
    Users,
    /// Pending signups awaiting OTP verification, id = email.
    Registrations,
    /// Per-user inventory aggregates, id = email.
    Inventory,
    /// Per-user menu documents, id = email.
    Menus,
    /// Per-user recipe documents, id = email (written by the invoice pipeline).
    Recipes,
    /// Per-user invoice documents, queried by embedded userId.
    Invoices,
}

impl Collection {
    /// Stable collection name used as the storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Registrations => "registrations",
            Self::Inventory => "inventory",
            Self::Menus => "menus",
            Self::Recipes => "recipes",
            Self::Invoices => "invoices",
        }
    }
}

/// Atomic point operations over JSON documents, plus one equality query.
///
/// Every write replaces the full document; there is no field-level patching
/// and no optimistic-concurrency token.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point-read a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend fails.
    async fn read(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or fully overwrite a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend fails.
    async fn upsert(&self, collection: Collection, id: &str, body: Value)
    -> Result<(), StoreError>;

    /// Insert a document, failing if the id already exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a document with this id exists.
    /// Returns `StoreError::Database` if the backend fails.
    async fn create(&self, collection: Collection, id: &str, body: Value)
    -> Result<(), StoreError>;

    /// Delete a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no document with this id exists.
    /// Returns `StoreError::Database` if the backend fails.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Find documents whose embedded `field` equals `value` exactly.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend fails.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Check backend connectivity (readiness probe).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the backend is unreachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Deserialize a stored document into a typed value, mapping shape mismatches
/// to `DataCorruption` so a bad row reads as a 500 rather than a panic.
pub(crate) fn from_document<T: serde::de::DeserializeOwned>(
    collection: Collection,
    value: Value,
) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| {
        StoreError::DataCorruption(format!(
            "invalid {} document: {e}",
            collection.as_str()
        ))
    })
}
