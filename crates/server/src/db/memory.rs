//! In-memory document store backend.
//!
//! A `HashMap` behind an async `RwLock`, used by the unit tests and handy
//! for running the server without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Collection, DocumentStore, StoreError};

/// Document store backed by process memory. Contents vanish on shutdown.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(Collection, String), Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.get(&(collection, id.to_owned())).cloned())
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.insert((collection, id.to_owned()), body);
        Ok(())
    }

    async fn create(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let key = (collection, id.to_owned());
        if documents.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "{} document already exists for this id",
                collection.as_str()
            )));
        }
        documents.insert(key, body);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents
            .remove(&(collection, id.to_owned()))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let documents = self.documents.read().await;
        let hits = documents
            .iter()
            .filter(|((coll, _), body)| {
                *coll == collection && body.get(field).and_then(Value::as_str) == Some(value)
            })
            .map(|(_, body)| body.clone())
            .collect();
        Ok(hits)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
