//! View-State Synchronizer
//!
//! Each page owns one `CollectionStore` per collection it shows. The store
//! holds the local snapshot and the loading flags; it only changes after the
//! remote side has confirmed a fetch or a mutation.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::{DomainError, Entity};
use crate::filter::{self, Filterable, ViewQuery};
use crate::repository::{CollectionClient, PageRequest, TypedCollections};

/// How a store catches up after a confirmed mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// Patch the snapshot with the confirmed record
    #[default]
    Patch,
    /// Refetch the whole collection, patching locally if that fails
    Refetch,
}

/// A confirmed remote mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Created(T),
    Updated(T),
    Deleted(String),
}

/// Local snapshot of one collection
#[derive(Debug, Clone)]
pub struct CollectionStore<T> {
    items: Vec<T>,
    loading: bool,
    loaded: bool,
    /// Set when the snapshot may disagree with the remote side
    stale: bool,
    next_cursor: Option<String>,
    last_error: Option<DomainError>,
    strategy: SyncStrategy,
}

impl<T> Default for CollectionStore<T> {
    fn default() -> Self {
        Self::new(SyncStrategy::default())
    }
}

impl<T> CollectionStore<T> {
    pub fn new(strategy: SyncStrategy) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            stale: false,
            next_cursor: None,
            last_error: None,
            strategy,
        }
    }
}

impl<T: Entity> CollectionStore<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn last_error(&self) -> Option<&DomainError> {
        self.last_error.as_ref()
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Fetch the whole collection once. Later calls are no-ops until `refresh`.
    ///
    /// A failed fetch is logged and leaves the store loaded but empty.
    pub async fn load<C: CollectionClient + ?Sized>(&mut self, client: &C) {
        if self.loaded {
            debug!(collection = T::COLLECTION, "already loaded, skipping fetch");
            return;
        }
        self.loading = true;
        match client.fetch_all::<T>().await {
            Ok(items) => {
                info!(collection = T::COLLECTION, count = items.len(), "loaded collection");
                self.items = items;
                self.last_error = None;
            }
            Err(e) => {
                error!(collection = T::COLLECTION, error = %e, "failed to load collection");
                self.items.clear();
                self.last_error = Some(e);
            }
        }
        self.next_cursor = None;
        self.loading = false;
        self.loaded = true;
    }

    /// Fetch only the first `limit` records (at least one); `load_more`
    /// continues from there
    pub async fn load_first_page<C: CollectionClient + ?Sized>(&mut self, client: &C, limit: usize) {
        if self.loaded {
            return;
        }
        self.loading = true;
        match client.fetch_page::<T>(&PageRequest::first(limit.max(1))).await {
            Ok(page) => {
                info!(collection = T::COLLECTION, count = page.items.len(), "loaded first page");
                self.items = page.items;
                self.next_cursor = page.next_cursor;
                self.last_error = None;
            }
            Err(e) => {
                error!(collection = T::COLLECTION, error = %e, "failed to load first page");
                self.items.clear();
                self.next_cursor = None;
                self.last_error = Some(e);
            }
        }
        self.loading = false;
        self.loaded = true;
    }

    /// Append the next page. Returns how many records were added.
    ///
    /// A page that hands back the cursor it was asked for ends the walk.
    pub async fn load_more<C: CollectionClient + ?Sized>(&mut self, client: &C, limit: usize) -> usize {
        let Some(cursor) = self.next_cursor.clone() else {
            return 0;
        };
        self.loading = true;
        let added = match client.fetch_page::<T>(&PageRequest::after(cursor.clone(), limit.max(1))).await {
            Ok(page) => {
                let before = self.items.len();
                for item in page.items {
                    self.add_item(item);
                }
                self.next_cursor = page.next_cursor.filter(|next| *next != cursor);
                self.last_error = None;
                self.items.len() - before
            }
            Err(e) => {
                warn!(collection = T::COLLECTION, error = %e, "failed to load next page");
                self.last_error = Some(e);
                0
            }
        };
        self.loading = false;
        added
    }

    /// Refetch the collection. On failure the previous snapshot is kept and
    /// marked stale.
    pub async fn refresh<C: CollectionClient + ?Sized>(&mut self, client: &C) -> bool {
        self.loading = true;
        let ok = match client.fetch_all::<T>().await {
            Ok(items) => {
                debug!(collection = T::COLLECTION, count = items.len(), "refreshed collection");
                self.items = items;
                self.next_cursor = None;
                self.stale = false;
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!(collection = T::COLLECTION, error = %e, "refresh failed, keeping snapshot");
                self.stale = true;
                self.last_error = Some(e);
                false
            }
        };
        self.loading = false;
        self.loaded = true;
        ok
    }

    /// Bring the snapshot in line with a confirmed mutation
    pub async fn reconcile<C: CollectionClient + ?Sized>(&mut self, client: &C, change: Change<T>) {
        if self.strategy == SyncStrategy::Refetch && self.refresh(client).await {
            return;
        }
        self.apply(change);
    }

    /// Apply a confirmed mutation to the snapshot without a round trip
    pub fn apply(&mut self, change: Change<T>) {
        match change {
            Change::Created(item) => self.add_item(item),
            Change::Updated(item) => {
                if !self.update_item(item.clone()) {
                    self.add_item(item);
                }
            }
            Change::Deleted(id) => {
                self.remove_item(&id);
            }
        }
    }

    // ========================
    // Store Helper Functions
    // ========================

    /// Append an item, replacing any existing item with the same id
    pub fn add_item(&mut self, item: T) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Update an item in the store by ID
    pub fn update_item(&mut self, updated: T) -> bool {
        match self.items.iter_mut().find(|item| item.id() == updated.id()) {
            Some(item) => {
                *item = updated;
                true
            }
            None => false,
        }
    }

    /// Remove an item from the store by ID
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }
}

impl<T: Entity + Filterable> CollectionStore<T> {
    /// Derived view of the current snapshot
    pub fn view(&self, query: &ViewQuery) -> Vec<T> {
        filter::apply(&self.items, query)
    }
}
