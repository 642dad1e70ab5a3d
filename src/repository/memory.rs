//! In-Memory Collection Client
//!
//! Holds every collection in a map behind an async lock. Used by tests and by
//! the CLI when no backend is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::traits::{paginate, record_id, record_revision, CollectionClient, Page, PageRequest, Record, REVISION_FIELD};
use crate::domain::{DomainError, DomainResult};

pub(crate) type Collections = HashMap<String, Vec<Record>>;

/// Insert `record`, which must carry an id not yet present
pub(crate) fn apply_create(
    collections: &mut Collections,
    collection: &str,
    record: Record,
) -> DomainResult<Record> {
    let Some(id) = record_id(&record) else {
        return Err(DomainError::write(collection, "record has no id"));
    };
    let items = collections.entry(collection.to_string()).or_default();
    if items.iter().any(|r| record_id(r) == Some(id)) {
        return Err(DomainError::write(collection, format!("duplicate id {}", id)));
    }
    items.push(record.clone());
    Ok(record)
}

/// Replace the stored record with the same id.
///
/// A missing revision reads as 0 on both sides, so the first accepted write
/// stamps revision 1 and any writer still holding the older copy conflicts.
pub(crate) fn apply_update(
    collections: &mut Collections,
    collection: &str,
    mut record: Record,
) -> DomainResult<Record> {
    let Some(id) = record_id(&record).map(str::to_string) else {
        return Err(DomainError::write(collection, "record has no id"));
    };
    let slot = collections
        .get_mut(collection)
        .and_then(|items| items.iter_mut().find(|r| record_id(r) == Some(id.as_str())))
        .ok_or_else(|| DomainError::not_found(collection, &id))?;

    let stored = record_revision(slot).unwrap_or(0);
    if record_revision(&record).unwrap_or(0) != stored {
        return Err(DomainError::conflict(collection, &id));
    }
    record.insert(REVISION_FIELD.to_string(), Value::from(stored + 1));
    *slot = record.clone();
    Ok(record)
}

pub(crate) fn apply_delete(collections: &mut Collections, collection: &str, id: &str) -> DomainResult<()> {
    let items = collections
        .get_mut(collection)
        .ok_or_else(|| DomainError::not_found(collection, id))?;
    let before = items.len();
    items.retain(|r| record_id(r) != Some(id));
    if items.len() == before {
        return Err(DomainError::not_found(collection, id));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryCollectionClient {
    collections: RwLock<Collections>,
}

impl MemoryCollectionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client preloaded with records, bypassing create checks
    pub fn with_records(seed: impl IntoIterator<Item = (String, Vec<Record>)>) -> Self {
        Self {
            collections: RwLock::new(seed.into_iter().collect()),
        }
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl CollectionClient for MemoryCollectionClient {
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>> {
        let guard = self.collections.read().await;
        Ok(guard.get(collection).cloned().unwrap_or_default())
    }

    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        let guard = self.collections.read().await;
        let items = guard.get(collection).map(Vec::as_slice).unwrap_or_default();
        Ok(paginate(items, request))
    }

    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record> {
        let mut guard = self.collections.write().await;
        apply_create(&mut guard, collection, record)
    }

    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record> {
        let mut guard = self.collections.write().await;
        apply_update(&mut guard, collection, record)
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        let mut guard = self.collections.write().await;
        apply_delete(&mut guard, collection, id)
    }
}
