//! HTTP client for the record store collections API

use crate::error::{Result, StoreError};
use crate::types::*;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the record store collections API
///
/// Every collection is addressed as `{base_url}/collections/{name}/items`.
///
/// # Example
///
/// ```rust,no_run
/// use record_store_client::{StoreClient, StoreConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StoreClient::new(StoreConfig::default())?;
///
/// if let Some(neo) = client.get_item("nearearthobjects", "neo-42").await? {
///     println!("{}", neo["name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct StoreClient {
    config: StoreConfig,
    client: Client,
}

impl StoreClient {
    /// Create a new record store client
    pub fn new(config: StoreConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| StoreError::InvalidResponse(format!("invalid API key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ==================== Collections API ====================

    /// List one page of a collection
    pub async fn list_items(
        &self,
        collection: &str,
        options: ListOptions,
    ) -> Result<ListItemsResponse> {
        let mut url = self.items_url(collection);

        let params = options.query_params();
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Get a single record by `_id`, `None` when the store has no such record
    pub async fn get_item(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let url = self.item_url(collection, id);

        let response = self.client.get(&url).send().await?;
        match self.handle_response(response).await {
            Ok(item) => Ok(Some(item)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a record, returning the stored form
    pub async fn create_item(&self, collection: &str, item: &Value) -> Result<Value> {
        let url = self.items_url(collection);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(item)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Apply a partial update to a record, returning the stored form
    pub async fn update_item(&self, collection: &str, id: &str, patch: &Value) -> Result<Value> {
        let url = self.item_url(collection, id);

        let response = self
            .client
            .patch(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(patch)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a record; `false` when it did not exist
    pub async fn delete_item(&self, collection: &str, id: &str) -> Result<bool> {
        let url = self.item_url(collection, id);

        let response = self.client.delete(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server { status, message: body });
        }
        Ok(true)
    }

    // ==================== Helper Methods ====================

    fn items_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/items",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(collection)
        )
    }

    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.items_url(collection), urlencoding::encode(id))
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(response.url().path().to_string()));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(StoreError::from)
    }
}
