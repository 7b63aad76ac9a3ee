//! Rust client for the record store collections API
//!
//! The record store keeps every collection as a bag of JSON records keyed by
//! `_id`. This crate only moves JSON; typed entities live in `neowatch-sdk`.
//!
//! # Example
//!
//! ```rust,no_run
//! use record_store_client::{ListOptions, StoreClient, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StoreClient::new(StoreConfig {
//!     base_url: "http://localhost:8080".into(),
//!     ..Default::default()
//! })?;
//!
//! // First page of twelve objects
//! let page = client
//!     .list_items("nearearthobjects", ListOptions::paged(12, 0))
//!     .await?;
//!
//! if page.has_next {
//!     let skip = page.next_skip.unwrap_or_default();
//!     let _more = client
//!         .list_items("nearearthobjects", ListOptions::paged(12, skip))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::StoreClient;
pub use error::{Result, StoreError};
pub use types::*;
