//! In-process record store.
//!
//! Honours filters and `limit`/`skip` paging the same way the remote store
//! does, and can be told to fail individual operation kinds.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;

use super::traits::{Page, PageRequest, QueryFilter, RecordStore};
use crate::error::{Result, WatchError};
use crate::traits::Record;

/// Operation kinds, for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
}

/// In-memory [`RecordStore`].
///
/// Collections keep insertion order; `get_all` pages over that order.
#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<HashMap<StoreOp, WatchError>>,
    get_all_calls: AtomicU32,
    get_by_id_calls: AtomicU32,
    create_calls: AtomicU32,
    update_calls: AtomicU32,
    delete_calls: AtomicU32,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with typed records.
    pub fn with_records<T: Record>(mut self, records: &[T]) -> Result<Self> {
        let raw = records
            .iter()
            .map(T::to_json)
            .collect::<Result<Vec<_>>>()?;
        self.collections
            .get_mut()
            .entry(T::collection().to_string())
            .or_default()
            .extend(raw);
        Ok(self)
    }

    /// Make every call of `op` fail with `error` until cleared.
    pub async fn fail(&self, op: StoreOp, error: WatchError) {
        self.failures.lock().await.insert(op, error);
    }

    pub async fn clear_failure(&self, op: StoreOp) {
        self.failures.lock().await.remove(&op);
    }

    /// Raw records currently stored in a collection
    pub async fn snapshot(&self, collection: &str) -> Vec<Value> {
        self.collections
            .lock()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Number of times `op` has been invoked, failed calls included
    pub fn call_count(&self, op: StoreOp) -> u32 {
        self.counter(op).load(Ordering::SeqCst)
    }

    fn counter(&self, op: StoreOp) -> &AtomicU32 {
        match op {
            StoreOp::GetAll => &self.get_all_calls,
            StoreOp::GetById => &self.get_by_id_calls,
            StoreOp::Create => &self.create_calls,
            StoreOp::Update => &self.update_calls,
            StoreOp::Delete => &self.delete_calls,
        }
    }

    async fn enter(&self, op: StoreOp) -> Result<()> {
        self.counter(op).fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().await.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("_id").and_then(Value::as_str)
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_all(
        &self,
        collection: &str,
        filter: &QueryFilter,
        page: Option<PageRequest>,
    ) -> Result<Page<Value>> {
        self.enter(StoreOp::GetAll).await?;

        let collections = self.collections.lock().await;
        let matching: Vec<&Value> = collections
            .get(collection)
            .map(|records| records.iter().filter(|r| filter.matches(r)).collect())
            .unwrap_or_default();

        let Some(PageRequest { limit, skip }) = page else {
            return Ok(Page::last(matching.into_iter().cloned().collect()));
        };

        let start = (skip as usize).min(matching.len());
        let end = start.saturating_add(limit as usize).min(matching.len());
        let items: Vec<Value> = matching[start..end].iter().map(|r| (*r).clone()).collect();
        let has_next = end < matching.len();

        Ok(Page {
            items,
            has_next,
            next_skip: has_next.then_some(end as u32),
        })
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.enter(StoreOp::GetById).await?;

        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned())
    }

    async fn create(&self, collection: &str, mut record: Value) -> Result<Value> {
        self.enter(StoreOp::Create).await?;

        let Some(fields) = record.as_object_mut() else {
            return Err(WatchError::Validation("record must be a JSON object".into()));
        };
        if !fields.get("_id").is_some_and(Value::is_string) {
            fields.insert("_id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
        }

        let mut collections = self.collections.lock().await;
        let records = collections.entry(collection.to_string()).or_default();
        if records.iter().any(|r| record_id(r) == record_id(&record)) {
            return Err(WatchError::Store(format!(
                "duplicate _id in {}: {}",
                collection,
                record_id(&record).unwrap_or_default()
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, patch: Value) -> Result<Value> {
        self.enter(StoreOp::Update).await?;

        let Some(id) = record_id(&patch).map(str::to_string) else {
            return Err(WatchError::Validation("patch is missing _id".into()));
        };
        let Some(fields) = patch.as_object() else {
            return Err(WatchError::Validation("patch must be a JSON object".into()));
        };

        let mut collections = self.collections.lock().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id.as_str())))
            .ok_or_else(|| WatchError::NotFound(format!("{}/{}", collection, id)))?;

        if let Some(target) = existing.as_object_mut() {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(existing.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.enter(StoreOp::Delete).await?;

        let mut collections = self.collections.lock().await;
        if let Some(records) = collections.get_mut(collection) {
            records.retain(|r| record_id(r) != Some(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NearEarthObject;
    use crate::store::RecordStoreExt;
    use serde_json::json;

    fn neos(count: usize) -> Vec<NearEarthObject> {
        (0..count)
            .map(|i| NearEarthObject {
                id: format!("neo-{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_paging_cursor() {
        let store = InMemoryRecordStore::new().with_records(&neos(30)).unwrap();

        let first = store
            .get_all("nearearthobjects", &QueryFilter::new(), Some(PageRequest::first(12)))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 12);
        assert!(first.has_next);
        assert_eq!(first.next_skip, Some(12));

        let last = store
            .get_all("nearearthobjects", &QueryFilter::new(), Some(PageRequest::new(12, 24)))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 6);
        assert!(!last.has_next);
        assert_eq!(last.next_skip, None);
    }

    #[tokio::test]
    async fn test_fetch_all_follows_cursors() {
        let store = InMemoryRecordStore::new().with_records(&neos(25)).unwrap();

        let all: Vec<NearEarthObject> = store.fetch_all(&QueryFilter::new(), 10, 100).await.unwrap();
        assert_eq!(all.len(), 25);
        assert_eq!(store.call_count(StoreOp::GetAll), 3);
        assert_eq!(all[24].id, "neo-24");
    }

    #[tokio::test]
    async fn test_fetch_all_respects_page_cap() {
        let store = InMemoryRecordStore::new().with_records(&neos(25)).unwrap();

        let capped: Vec<NearEarthObject> = store.fetch_all(&QueryFilter::new(), 10, 2).await.unwrap();
        assert_eq!(capped.len(), 20);
    }

    #[tokio::test]
    async fn test_create_assigns_missing_id() {
        let store = InMemoryRecordStore::new();
        let stored = store
            .create("communitydiscussions", json!({"subject": "hello"}))
            .await
            .unwrap();
        assert!(stored["_id"].is_string());
        assert_eq!(store.len("communitydiscussions").await, 1);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryRecordStore::new();
        store
            .create("watchedasteroids", json!({"_id": "w-1", "neoId": "n-1", "customAlertsEnabled": false}))
            .await
            .unwrap();

        let stored = store
            .update("watchedasteroids", json!({"_id": "w-1", "customAlertsEnabled": true}))
            .await
            .unwrap();
        assert_eq!(stored["customAlertsEnabled"], true);
        assert_eq!(stored["neoId"], "n-1");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryRecordStore::new();
        store.fail(StoreOp::Delete, WatchError::Network("offline".into())).await;

        let err = store.delete("watchedasteroids", "w-1").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(store.call_count(StoreOp::Delete), 1);

        store.clear_failure(StoreOp::Delete).await;
        assert!(store.delete("watchedasteroids", "w-1").await.is_ok());
    }
}
