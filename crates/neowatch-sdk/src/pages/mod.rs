//! Per-view state objects
//!
//! One struct per screen, each owning its caches outright. Loads are split
//! into `begin_load` / `fetch` / `finish_load` so a host can run the fetch
//! wherever it likes; `finish_load` drops results that belong to an earlier
//! mount. `load` runs all three in sequence.

mod community;
mod dashboard;
mod detail;
mod profile;
mod watchlist;

pub use community::{CommunityData, CommunityRow, CommunityView, PostDraft};
pub use dashboard::DashboardView;
pub use detail::{DetailState, NeoDetailView};
pub use profile::{ProfileStats, ProfileView};
pub use watchlist::{WatchlistData, WatchlistRow, WatchlistView};

use tracing::{debug, warn};

use crate::error::WatchError;
use crate::lifecycle::{Generation, Lifecycle};
use crate::mutation::{MutationState, PendingWrite};
use crate::notice::Notice;

/// Where the not-found state sends the user
pub const DASHBOARD_ROUTE: &str = "/dashboard";

pub const WATCHLIST_SIGN_IN: &str = "Sign in to access your watchlist";

pub const PROFILE_SIGN_IN: &str = "Sign in to view your profile";

const UNREACHABLE: &str = "Unable to reach the server. Showing the last loaded data.";

/// A load started by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: Generation,
}

impl LoadTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

/// Result of preparing a user-initiated create
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    /// Not signed in; a login redirect was requested
    LoginRequired,
    /// Required input missing; nothing was applied
    Incomplete,
    /// Applied locally; send the write and settle it
    Ready(PendingWrite),
}

/// Outcome of a user-initiated create
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    LoginRequired,
    Incomplete,
    Settled(MutationState),
}

/// Load bookkeeping shared by every view
#[derive(Debug, Clone, Default)]
pub struct ViewStatus {
    lifecycle: Lifecycle,
    loading: bool,
    banner: Option<String>,
    notices: Vec<Notice>,
}

impl ViewStatus {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// Non-blocking message shown while the store is unreachable
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub(crate) fn begin(&mut self) -> LoadTicket {
        self.loading = true;
        LoadTicket {
            generation: self.lifecycle.mount(),
        }
    }

    /// Whether results for `ticket` may still be applied
    pub(crate) fn accept(&mut self, ticket: LoadTicket, view: &'static str) -> bool {
        if !self.lifecycle.is_current(ticket.generation) {
            debug!(view, generation = ticket.generation.value(), "Dropping results for a superseded load");
            return false;
        }
        self.loading = false;
        true
    }

    pub(crate) fn succeeded(&mut self) {
        self.banner = None;
    }

    /// Unreachable store becomes the banner, anything else a notice
    pub(crate) fn failed(&mut self, view: &'static str, error: &WatchError) {
        warn!(view, error = %error, "Load failed");
        if error.is_transport() {
            self.banner = Some(UNREACHABLE.to_string());
        } else {
            self.notices.push(Notice::error(format!("Could not load {}: {}", view, error)));
        }
    }

    pub(crate) fn push_notices(&mut self, notices: Vec<Notice>) {
        self.notices.extend(notices);
    }

    pub(crate) fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_sets_banner() {
        let mut status = ViewStatus::default();
        status.failed("watchlist", &WatchError::Network("timed out".into()));
        assert!(status.banner().is_some());
        assert!(status.take_notices().is_empty());

        status.succeeded();
        assert!(status.banner().is_none());
    }

    #[test]
    fn test_other_failure_queues_notice() {
        let mut status = ViewStatus::default();
        status.failed("watchlist", &WatchError::Store("500".into()));
        assert!(status.banner().is_none());
        assert_eq!(status.take_notices().len(), 1);
    }

    #[test]
    fn test_superseded_ticket_rejected() {
        let mut status = ViewStatus::default();
        let first = status.begin();
        let second = status.begin();

        assert!(!status.accept(first, "test"));
        assert!(status.is_loading());
        assert!(status.accept(second, "test"));
        assert!(!status.is_loading());
    }
}
