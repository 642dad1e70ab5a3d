//! Repository Layer - Core Traits
//!
//! Defines the abstract interface to the remote collection service.
//! Implementations can be in-memory, a directory of JSON files, or a REST CMS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{DomainError, DomainResult, Entity};

/// An untyped collection record as it travels over the wire
pub type Record = Map<String, Value>;

/// Key holding a record's id
pub const ID_FIELD: &str = "_id";
/// Key holding a record's optional revision counter
pub const REVISION_FIELD: &str = "_revision";

pub fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str).filter(|id| !id.is_empty())
}

pub fn record_revision(record: &Record) -> Option<u64> {
    record.get(REVISION_FIELD).and_then(Value::as_u64)
}

/// Cursor/limit window over a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            cursor: None,
            limit: Some(limit),
        }
    }

    pub fn after(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit: Some(limit),
        }
    }
}

/// One window of results; `next_cursor` is `None` on the last page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Slice a full listing into a page using an offset cursor.
///
/// A zero limit is treated as one so every page advances the cursor.
pub fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> Page<T> {
    let start = request
        .cursor
        .as_deref()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = match request.limit {
        Some(limit) => start.saturating_add(limit.max(1)).min(items.len()),
        None => items.len(),
    };
    let next_cursor = (end < items.len()).then(|| end.to_string());
    Page {
        items: items[start..end].to_vec(),
        next_cursor,
    }
}

/// Core client trait for the remote collection service
///
/// Object safe so pages can hold an `Arc<dyn CollectionClient>`.
/// Every call is a suspension point; no call is applied locally by the client.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Fetch every record of a collection
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>>;

    /// Fetch one window of a collection
    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        let all = self.get_all(collection).await?;
        Ok(paginate(&all, request))
    }

    /// Insert a record carrying a caller-assigned id
    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record>;

    /// Replace the record with the same id
    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record>;

    /// Remove a record by id
    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()>;
}

fn encode<T: Entity>(entity: &T) -> DomainResult<Record> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DomainError::serialization(T::COLLECTION, "record is not an object")),
        Err(e) => Err(DomainError::serialization(T::COLLECTION, e.to_string())),
    }
}

fn decode<T: Entity>(record: Record) -> DomainResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| DomainError::serialization(T::COLLECTION, e.to_string()))
}

fn decode_all<T: Entity>(records: Vec<Record>) -> DomainResult<Vec<T>> {
    records.into_iter().map(decode).collect()
}

/// Typed access to collections via `Entity::COLLECTION`
#[async_trait]
pub trait TypedCollections {
    async fn fetch_all<T: Entity>(&self) -> DomainResult<Vec<T>>;

    async fn fetch_page<T: Entity>(&self, request: &PageRequest) -> DomainResult<Page<T>>;

    async fn create_entity<T: Entity>(&self, entity: &T) -> DomainResult<T>;

    async fn update_entity<T: Entity>(&self, entity: &T) -> DomainResult<T>;

    async fn delete_entity<T: Entity>(&self, id: &str) -> DomainResult<()>;
}

#[async_trait]
impl<C: CollectionClient + ?Sized> TypedCollections for C {
    async fn fetch_all<T: Entity>(&self) -> DomainResult<Vec<T>> {
        let records = self.get_all(T::COLLECTION).await?;
        decode_all(records)
    }

    async fn fetch_page<T: Entity>(&self, request: &PageRequest) -> DomainResult<Page<T>> {
        let page = self.get_page(T::COLLECTION, request).await?;
        Ok(Page {
            items: decode_all(page.items)?,
            next_cursor: page.next_cursor,
        })
    }

    async fn create_entity<T: Entity>(&self, entity: &T) -> DomainResult<T> {
        let record = encode(entity)?;
        decode(self.create(T::COLLECTION, record).await?)
    }

    async fn update_entity<T: Entity>(&self, entity: &T) -> DomainResult<T> {
        let record = encode(entity)?;
        decode(self.update(T::COLLECTION, record).await?)
    }

    async fn delete_entity<T: Entity>(&self, id: &str) -> DomainResult<()> {
        self.delete(T::COLLECTION, id).await
    }
}
