//! [`RecordStore`] over the record store HTTP API

use async_trait::async_trait;
use record_store_client::{ListOptions, StoreClient, StoreConfig};
use serde_json::Value;

use super::traits::{Page, PageRequest, QueryFilter, RecordStore};
use crate::config::SdkConfig;
use crate::error::{Result, WatchError};

/// HTTP-backed record store
pub struct HttpRecordStore {
    client: StoreClient,
}

impl HttpRecordStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        Ok(Self {
            client: StoreClient::new(config)?,
        })
    }

    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        Self::new(config.store_config())
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn get_all(
        &self,
        collection: &str,
        filter: &QueryFilter,
        page: Option<PageRequest>,
    ) -> Result<Page<Value>> {
        let options = ListOptions {
            filter: filter.conditions().clone(),
            limit: page.map(|p| p.limit),
            skip: page.map(|p| p.skip),
        };

        let response = self.client.list_items(collection, options).await?;
        Ok(Page {
            items: response.items,
            has_next: response.has_next,
            next_skip: response.next_skip,
        })
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self.client.get_item(collection, id).await?)
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value> {
        Ok(self.client.create_item(collection, &record).await?)
    }

    async fn update(&self, collection: &str, patch: Value) -> Result<Value> {
        let id = patch
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| WatchError::Validation("patch is missing _id".into()))?
            .to_string();
        Ok(self.client.update_item(collection, &id, &patch).await?)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let existed = self.client.delete_item(collection, id).await?;
        if !existed {
            tracing::debug!(collection, id, "Delete of a record the store no longer had");
        }
        Ok(())
    }
}
