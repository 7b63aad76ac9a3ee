//! NEO Watch SDK - view state for the near-Earth object dashboard
//!
//! Aggregates records from an external record store into the state each
//! dashboard screen renders.
//!
//! # Architecture
//!
//! - **Pagination**: object listings grow page by page, following the
//!   store's `next_skip` cursor, one load at a time
//! - **Joins**: the store has no join query, so watch entries and
//!   discussions are resolved against the object collection client-side
//! - **Views**: search, hazard filter and sort are pure projections over
//!   whatever has been accumulated
//! - **Mutations**: changes show up locally first; a refused write is
//!   reverted, restored, or marked unsynced
//!
//! Each screen owns its state (see [`pages`]); nothing is shared between
//! screens, and results arriving after a screen was left are dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use neowatch_sdk::{DashboardView, HttpRecordStore, SdkConfig, SortKey};
//!
//! let config = SdkConfig::from_file("neowatch.toml")?;
//! let store = HttpRecordStore::from_config(&config)?;
//!
//! let mut dashboard = DashboardView::new(&config.paging);
//! dashboard.load_initial(&store).await;
//! dashboard.set_sort(SortKey::Risk);
//!
//! for neo in dashboard.visible() {
//!     println!("{} {}", neo.display_name(), neo.risk_level().label());
//! }
//!
//! if dashboard.can_load_more() {
//!     dashboard.load_more(&store).await;
//! }
//! ```

// Core traits for entity types
pub mod traits;

// Store collections
pub mod entities;

// Record store contract and implementations
pub mod store;

// Member identity
pub mod identity;

// Page accumulation and joins
pub mod cache;

// Filter and sort projections
pub mod view;

// Optimistic mutations
pub mod mutation;

// Per-screen state
pub mod pages;

// Mount generations
pub mod lifecycle;

// User-facing notices
pub mod notice;

// Configuration
pub mod config;

// Error types
pub mod error;

// Re-export core traits
pub use traits::Record;

// Re-export entities
pub use entities::{
    CommunityDiscussion, NearEarthObject, RiskLevel, UserProfile, WatchedAsteroid, ANONYMOUS_AUTHOR,
};

// Re-export store types
pub use store::{
    InMemoryRecordStore, Page, PageRequest, QueryFilter, RecordStore, RecordStoreExt, StoreOp,
};

#[cfg(feature = "client")]
pub use store::HttpRecordStore;

// Re-export identity types
pub use identity::{require_member, IdentityProvider, Member, StaticIdentity, ViewAccess};

// Re-export cache types
pub use cache::{JoinIndex, JoinResolver, JoinStrategy, PaginationAccumulator};

// Re-export view types
pub use view::{project, FilterSpec, HazardFilter, SortKey};

// Re-export mutation types
pub use mutation::{MutationState, OptimisticList, PendingWrite, SyncStatus};

// Re-export page types
pub use pages::{
    CommunityView, DashboardView, DetailState, NeoDetailView, PostDraft, Prepared, ProfileView,
    Submission, WatchlistView,
};

pub use lifecycle::LoadOutcome;
pub use notice::{Notice, NoticeLevel};
pub use config::SdkConfig;
pub use error::{Result, WatchError};

// Re-export from the underlying client crate
#[cfg(feature = "client")]
pub use record_store_client::{StoreClient, StoreConfig, StoreError};
