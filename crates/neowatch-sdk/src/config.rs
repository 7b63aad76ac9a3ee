//! SDK configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WatchError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdkConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Record store base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the record store
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size for object listings
    #[serde(default = "default_listing_page_size")]
    pub listing_page_size: u32,

    /// Page size for pick-lists
    #[serde(default = "default_picklist_page_size")]
    pub picklist_page_size: u32,

    /// Upper bound on pages followed when a whole collection is fetched
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

// Defaults
fn default_base_url() -> String { "http://localhost:8080".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_listing_page_size() -> u32 { 12 }
fn default_picklist_page_size() -> u32 { 20 }
fn default_max_pages() -> u32 { 100 }

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            listing_page_size: default_listing_page_size(),
            picklist_page_size: default_picklist_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl SdkConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SdkConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.paging.listing_page_size == 0 {
            return Err(WatchError::Config("paging.listing_page_size must be > 0".into()));
        }
        if self.paging.picklist_page_size == 0 {
            return Err(WatchError::Config("paging.picklist_page_size must be > 0".into()));
        }
        if self.paging.max_pages == 0 {
            return Err(WatchError::Config("paging.max_pages must be > 0".into()));
        }
        if self.store.base_url.trim().is_empty() {
            return Err(WatchError::Config("store.base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Settings for the HTTP record store client
    #[cfg(feature = "client")]
    pub fn store_config(&self) -> record_store_client::StoreConfig {
        record_store_client::StoreConfig {
            base_url: self.store.base_url.clone(),
            api_key: self.store.api_key.clone(),
            timeout_secs: self.store.timeout_secs,
        }
    }
}
