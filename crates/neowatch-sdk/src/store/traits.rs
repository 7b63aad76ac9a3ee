//! Record store seam
//!
//! `RecordStore` is the untyped contract the external store fulfils.
//! `RecordStoreExt` layers typed, entity-aware helpers on top of it.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, WatchError};
use crate::traits::Record;

/// Conjunction of field-equality conditions. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    conditions: Map<String, Value>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &Map<String, Value> {
        &self.conditions
    }

    /// Whether a stored record satisfies every condition
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

/// Bounds for one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub skip: u32,
}

impl PageRequest {
    pub fn new(limit: u32, skip: u32) -> Self {
        Self { limit, skip }
    }

    pub fn first(limit: u32) -> Self {
        Self { limit, skip: 0 }
    }
}

/// One page of results and the cursor to the next
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub next_skip: Option<u32>,
}

impl<T> Page<T> {
    /// A terminal page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_next: false,
            next_skip: None,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::last(Vec::new())
    }
}

impl Page<Value> {
    /// Decode every raw record into `T`
    pub fn decode<T: Record>(self) -> Result<Page<T>> {
        let items = self
            .items
            .into_iter()
            .map(T::from_json)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page {
            items,
            has_next: self.has_next,
            next_skip: self.next_skip,
        })
    }
}

/// Generic CRUD access to named collections.
///
/// Implementations must be safe to share; every call is independent.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List a collection. `None` for `page` asks for everything the store
    /// is willing to return in one response.
    async fn get_all(
        &self,
        collection: &str,
        filter: &QueryFilter,
        page: Option<PageRequest>,
    ) -> Result<Page<Value>>;

    /// Look a record up by `_id`
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Create a record, returning the stored form
    async fn create(&self, collection: &str, record: Value) -> Result<Value>;

    /// Apply a partial record carrying `_id`, returning the stored form
    async fn update(&self, collection: &str, patch: Value) -> Result<Value>;

    /// Delete a record by `_id`
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Typed helpers over any [`RecordStore`]
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    async fn fetch_page<T: Record>(&self, filter: &QueryFilter, page: PageRequest) -> Result<Page<T>> {
        let raw = self.get_all(T::collection(), filter, Some(page)).await?;
        raw.decode()
    }

    /// Follow `next_skip` cursors until the store reports no more pages,
    /// stopping after `max_pages` requests.
    async fn fetch_all<T: Record>(
        &self,
        filter: &QueryFilter,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut skip = 0;

        for _ in 0..max_pages {
            let page = self
                .fetch_page::<T>(filter, PageRequest::new(page_size, skip))
                .await?;
            let received = page.items.len() as u32;
            items.extend(page.items);

            if !page.has_next || received == 0 {
                debug!(collection = T::collection(), count = items.len(), "Fetched collection");
                return Ok(items);
            }
            skip = page.next_skip.unwrap_or(skip + received);
        }

        warn!(
            collection = T::collection(),
            max_pages,
            count = items.len(),
            "Stopped following pages at the configured cap"
        );
        Ok(items)
    }

    async fn fetch_one<T: Record>(&self, id: &str) -> Result<Option<T>> {
        match self.get_by_id(T::collection(), id).await? {
            Some(raw) => Ok(Some(T::from_json(raw)?)),
            None => Ok(None),
        }
    }

    async fn create_record<T: Record>(&self, record: &T) -> Result<T> {
        let stored = self.create(T::collection(), record.to_json()?).await?;
        T::from_json(stored)
    }

    /// Send a partial update. `patch` must carry `_id`.
    async fn patch_record<T: Record>(&self, patch: Value) -> Result<T> {
        if patch.get("_id").and_then(Value::as_str).is_none() {
            return Err(WatchError::Validation("patch is missing _id".into()));
        }
        let stored = self.update(T::collection(), patch).await?;
        T::from_json(stored)
    }

    async fn delete_record<T: Record>(&self, id: &str) -> Result<()> {
        self.delete(T::collection(), id).await
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}
