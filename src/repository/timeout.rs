//! Timeout wrapper at the client boundary
//!
//! Bounds every call of an inner client. An elapsed read becomes a `Fetch`
//! error and an elapsed write a `Write` error, so callers recover the same way
//! they would from any other failure.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::traits::{CollectionClient, Page, PageRequest, Record};
use crate::domain::{DomainError, DomainResult};

pub struct TimeoutClient<C> {
    inner: C,
    limit: Duration,
}

impl<C> TimeoutClient<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = DomainResult<T>>,
        on_elapsed: impl FnOnce(String) -> DomainError,
    ) -> DomainResult<T> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                let message = format!("timed out after {} ms", self.limit.as_millis());
                warn!("{}", message);
                Err(on_elapsed(message))
            }
        }
    }
}

#[async_trait]
impl<C: CollectionClient> CollectionClient for TimeoutClient<C> {
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>> {
        self.bounded(self.inner.get_all(collection), |m| DomainError::fetch(collection, m))
            .await
    }

    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        self.bounded(self.inner.get_page(collection, request), |m| {
            DomainError::fetch(collection, m)
        })
        .await
    }

    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.bounded(self.inner.create(collection, record), |m| DomainError::write(collection, m))
            .await
    }

    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.bounded(self.inner.update(collection, record), |m| DomainError::write(collection, m))
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        self.bounded(self.inner.delete(collection, id), |m| DomainError::write(collection, m))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryCollectionClient;
    use crate::testing::ScriptedClient;

    #[tokio::test]
    async fn test_passes_through_fast_calls() {
        let client = TimeoutClient::new(MemoryCollectionClient::new(), Duration::from_secs(1));
        assert!(client.get_all("projects").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hung_write_becomes_write_error() {
        let scripted = ScriptedClient::new();
        scripted.hang_writes(true);
        let client = TimeoutClient::new(scripted, Duration::from_millis(20));

        let err = client.delete("projects", "p1").await.unwrap_err();
        assert!(matches!(err, DomainError::Write { .. }));
    }

    #[tokio::test]
    async fn test_hung_read_becomes_fetch_error() {
        let scripted = ScriptedClient::new();
        scripted.hang_reads(true);
        let client = TimeoutClient::new(scripted, Duration::from_millis(20));

        let err = client.get_all("projects").await.unwrap_err();
        assert!(matches!(err, DomainError::Fetch { .. }));
    }
}
