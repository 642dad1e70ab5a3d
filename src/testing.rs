//! Test-only scripted client
//!
//! Wraps the in-memory client and lets a test fail or stall individual
//! operations and count the calls that reached it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DomainError, DomainResult, Entity};
use crate::repository::{CollectionClient, MemoryCollectionClient, Page, PageRequest, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    GetAll,
    GetPage,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
pub struct ScriptedClient {
    inner: MemoryCollectionClient,
    failures: Mutex<HashMap<Call, DomainError>>,
    calls: Mutex<HashMap<Call, usize>>,
    hang_reads: AtomicBool,
    hang_writes: AtomicBool,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed typed records directly into the backing store
    pub fn seeded<T: Entity>(items: &[T]) -> Self {
        let records = items
            .iter()
            .filter_map(|item| match serde_json::to_value(item) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            })
            .collect();
        Self {
            inner: MemoryCollectionClient::with_records([(T::COLLECTION.to_string(), records)]),
            ..Default::default()
        }
    }

    /// Fail every later `call` with `error`
    pub fn fail(&self, call: Call, error: DomainError) {
        self.failures.lock().unwrap().insert(call, error);
    }

    pub fn heal(&self, call: Call) {
        self.failures.lock().unwrap().remove(&call);
    }

    pub fn hang_reads(&self, hang: bool) {
        self.hang_reads.store(hang, Ordering::SeqCst);
    }

    pub fn hang_writes(&self, hang: bool) {
        self.hang_writes.store(hang, Ordering::SeqCst);
    }

    pub fn calls(&self, call: Call) -> usize {
        self.calls.lock().unwrap().get(&call).copied().unwrap_or(0)
    }

    pub fn inner(&self) -> &MemoryCollectionClient {
        &self.inner
    }

    async fn enter(&self, call: Call) -> DomainResult<()> {
        *self.calls.lock().unwrap().entry(call).or_default() += 1;
        let hang = match call {
            Call::GetAll | Call::GetPage => self.hang_reads.load(Ordering::SeqCst),
            _ => self.hang_writes.load(Ordering::SeqCst),
        };
        if hang {
            std::future::pending::<()>().await;
        }
        let failure = self.failures.lock().unwrap().get(&call).cloned();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionClient for ScriptedClient {
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>> {
        self.enter(Call::GetAll).await?;
        self.inner.get_all(collection).await
    }

    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        self.enter(Call::GetPage).await?;
        self.inner.get_page(collection, request).await
    }

    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.enter(Call::Create).await?;
        self.inner.create(collection, record).await
    }

    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.enter(Call::Update).await?;
        self.inner.update(collection, record).await
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        self.enter(Call::Delete).await?;
        self.inner.delete(collection, id).await
    }
}
