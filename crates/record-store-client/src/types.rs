//! Types for the record store client API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the record store HTTP API
    pub base_url: String,
    /// Optional API key sent as a bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Options for listing a collection
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Field-equality conditions, all of which must hold
    pub filter: Map<String, Value>,
    /// Maximum records in the page
    pub limit: Option<u32>,
    /// Records to skip before the page starts
    pub skip: Option<u32>,
}

impl ListOptions {
    /// Options for one bounded page
    pub fn paged(limit: u32, skip: u32) -> Self {
        Self {
            limit: Some(limit),
            skip: Some(skip),
            ..Default::default()
        }
    }

    /// Add an equality condition
    pub fn with_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub(crate) fn query_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if !self.filter.is_empty() {
            let encoded = Value::Object(self.filter.clone()).to_string();
            params.push(format!("filter={}", urlencoding::encode(&encoded)));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(skip) = self.skip {
            params.push(format!("skip={}", skip));
        }
        params
    }
}

/// Response from the list items endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsResponse {
    /// Records in this page, in store order
    pub items: Vec<Value>,
    /// Whether more records follow this page
    #[serde(default)]
    pub has_next: bool,
    /// Skip value for the following page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_skip: Option<u32>,
    /// Total records matching the filter, when the store reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}
