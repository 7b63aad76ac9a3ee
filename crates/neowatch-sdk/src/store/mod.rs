//! Record store access
//!
//! The store itself is external; this module holds the contract, typed
//! helpers, an in-process implementation and (feature `client`) the HTTP
//! adapter.

#[cfg(feature = "client")]
mod http;
mod memory;
mod traits;

#[cfg(feature = "client")]
pub use http::HttpRecordStore;
pub use memory::{InMemoryRecordStore, StoreOp};
pub use traits::{Page, PageRequest, QueryFilter, RecordStore, RecordStoreExt};
