//! JSON File Collection Client
//!
//! Persists each collection as `<dir>/<collection>.json` holding an array of
//! records. Writes go to a temporary file first and are renamed into place, so
//! a failed write leaves the previous contents intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::memory::{apply_create, apply_delete, apply_update, Collections};
use super::traits::{paginate, CollectionClient, Page, PageRequest, Record};
use crate::domain::{DomainError, DomainResult};

pub struct JsonFileCollectionClient {
    dir: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileCollectionClient {
    /// Open (and create if needed) the data directory
    pub async fn open(dir: impl AsRef<Path>) -> DomainResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::fetch("*", format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    async fn read(&self, collection: &str) -> DomainResult<Vec<Record>> {
        let path = self.path_for(collection);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| DomainError::serialization(collection, e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DomainError::fetch(collection, e.to_string())),
        }
    }

    async fn persist(&self, collection: &str, records: &[Record]) -> DomainResult<()> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| DomainError::serialization(collection, e.to_string()))?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| DomainError::write(collection, e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| DomainError::write(collection, e.to_string()))
    }

    /// Load one collection, apply `change`, and persist the result
    async fn mutate<R: Send>(
        &self,
        collection: &str,
        change: impl FnOnce(&mut Collections) -> DomainResult<R> + Send,
    ) -> DomainResult<R> {
        let _guard = self.lock.lock().await;
        let records = self.read(collection).await.map_err(|e| match e {
            DomainError::Fetch { collection, message } => DomainError::Write { collection, message },
            other => other,
        })?;
        let mut working = Collections::new();
        working.insert(collection.to_string(), records);
        let out = change(&mut working)?;
        let updated = working.remove(collection).unwrap_or_default();
        self.persist(collection, &updated).await?;
        Ok(out)
    }
}

#[async_trait]
impl CollectionClient for JsonFileCollectionClient {
    async fn get_all(&self, collection: &str) -> DomainResult<Vec<Record>> {
        let _guard = self.lock.lock().await;
        self.read(collection).await
    }

    async fn get_page(&self, collection: &str, request: &PageRequest) -> DomainResult<Page<Record>> {
        let _guard = self.lock.lock().await;
        let records = self.read(collection).await?;
        Ok(paginate(&records, request))
    }

    async fn create(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.mutate(collection, |all| apply_create(all, collection, record)).await
    }

    async fn update(&self, collection: &str, record: Record) -> DomainResult<Record> {
        self.mutate(collection, |all| apply_update(all, collection, record)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<()> {
        self.mutate(collection, |all| apply_delete(all, collection, id)).await
    }
}
