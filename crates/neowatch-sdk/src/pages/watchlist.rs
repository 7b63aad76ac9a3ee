//! The signed-in member's watched objects

use serde_json::json;
use tracing::debug;

use crate::cache::{JoinIndex, JoinResolver};
use crate::config::PagingConfig;
use crate::entities::{NearEarthObject, WatchedAsteroid};
use crate::error::Result;
use crate::identity::{require_member, IdentityProvider, ViewAccess};
use crate::lifecycle::LoadOutcome;
use crate::mutation::{MutationId, MutationState, OptimisticList, PendingWrite, Tracked};
use crate::notice::Notice;
use crate::store::{QueryFilter, RecordStore, RecordStoreExt};

use super::{LoadTicket, Prepared, Submission, ViewStatus, WATCHLIST_SIGN_IN};

const VIEW: &str = "watchlist";

/// What one watchlist load brings back
#[derive(Debug, Clone, Default)]
pub struct WatchlistData {
    pub watches: Vec<WatchedAsteroid>,
    pub neos: JoinIndex<NearEarthObject>,
}

/// A watch entry whose object resolved
#[derive(Debug, Clone, Copy)]
pub struct WatchlistRow<'a> {
    pub watch: &'a Tracked<WatchedAsteroid>,
    pub neo: &'a NearEarthObject,
}

#[derive(Debug, Clone)]
pub struct WatchlistView {
    access: ViewAccess,
    member_id: Option<String>,
    watches: OptimisticList<WatchedAsteroid>,
    neos: JoinIndex<NearEarthObject>,
    page_size: u32,
    max_pages: u32,
    status: ViewStatus,
}

impl WatchlistView {
    pub fn new(paging: &PagingConfig) -> Self {
        Self {
            access: ViewAccess::Granted,
            member_id: None,
            watches: OptimisticList::new(),
            neos: JoinIndex::default(),
            page_size: paging.listing_page_size,
            max_pages: paging.max_pages,
            status: ViewStatus::default(),
        }
    }

    pub fn access(&self) -> &ViewAccess {
        &self.access
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Start a load for the current member. `None` when nobody is signed in;
    /// [`access`](Self::access) then carries the sign-in prompt.
    pub fn begin_load(&mut self, identity: &dyn IdentityProvider) -> Option<LoadTicket> {
        self.access = require_member(identity, WATCHLIST_SIGN_IN);
        match (&self.access, identity.member_id()) {
            (ViewAccess::Granted, Some(member_id)) => {
                self.member_id = Some(member_id);
                Some(self.status.begin())
            }
            _ => {
                self.member_id = None;
                self.watches.replace_all(Vec::new());
                self.neos = JoinIndex::default();
                None
            }
        }
    }

    /// The member's watches and the objects they point at, resolved by `_id`.
    pub async fn fetch<S: RecordStore + ?Sized>(
        store: &S,
        member_id: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<WatchlistData> {
        let filter = QueryFilter::new().eq("userId", member_id);
        let mut watches: Vec<WatchedAsteroid> = store.fetch_all(&filter, page_size, max_pages).await?;
        // Stores that ignore the filter still must not leak other members' entries
        watches.retain(|w| w.belongs_to(member_id));

        let neos = JoinResolver::new(store, page_size, max_pages)
            .resolve(&watches)
            .await?;
        Ok(WatchlistData { watches, neos })
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<WatchlistData>) -> LoadOutcome {
        if !self.status.accept(ticket, VIEW) {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(data) => {
                let received = data.watches.len();
                self.watches.replace_all(data.watches);
                self.neos = data.neos;
                self.status.succeeded();
                debug!(watches = received, hidden = self.hidden_count(), "Watchlist loaded");
                LoadOutcome::Applied { received }
            }
            Err(e) => {
                self.status.failed(VIEW, &e);
                LoadOutcome::Failed(e)
            }
        }
    }

    pub async fn load<S: RecordStore + ?Sized>(&mut self, store: &S, identity: &dyn IdentityProvider) -> LoadOutcome {
        let Some(ticket) = self.begin_load(identity) else {
            return LoadOutcome::SignInRequired;
        };
        let member_id = self.member_id.clone().unwrap_or_default();
        let result = Self::fetch(store, &member_id, self.page_size, self.max_pages).await;
        self.finish_load(ticket, result)
    }

    /// Entries to show. Entries whose object did not resolve are left out.
    pub fn rows(&self) -> Vec<WatchlistRow<'_>> {
        self.watches
            .entries()
            .iter()
            .filter_map(|watch| {
                self.neos
                    .resolve(&watch.record)
                    .map(|neo| WatchlistRow { watch, neo })
            })
            .collect()
    }

    /// Entries left out of [`rows`](Self::rows) for lack of an object
    pub fn hidden_count(&self) -> usize {
        self.watches.len() - self.rows().len()
    }

    pub fn entries(&self) -> &[Tracked<WatchedAsteroid>] {
        self.watches.entries()
    }

    pub fn is_watching(&self, neo_id: &str) -> bool {
        self.watches
            .records()
            .any(|w| w.neo_id.as_deref() == Some(neo_id))
    }

    /// Flip the alert flag locally. `None` when the entry is not listed.
    pub fn begin_toggle_alerts(&mut self, watch_id: &str) -> Option<PendingWrite> {
        let enabled = !self.watches.get(watch_id)?.record.custom_alerts_enabled;
        self.watches.apply_update(
            watch_id,
            json!({ "customAlertsEnabled": enabled }),
            |w| w.custom_alerts_enabled = enabled,
        )
    }

    /// Take an entry off the list. An entry the store never saved is
    /// discarded without a write; one still being added stays put.
    pub fn begin_remove(&mut self, watch_id: &str) -> Option<PendingWrite> {
        self.watches.apply_delete(watch_id)
    }

    /// Watch `neo` locally; requests a login redirect when nobody is signed in.
    pub fn begin_add(
        &mut self,
        identity: &dyn IdentityProvider,
        neo: &NearEarthObject,
        notes: Option<&str>,
    ) -> Result<Prepared> {
        let Some(member_id) = identity.member_id().filter(|_| identity.is_authenticated()) else {
            identity.login();
            return Ok(Prepared::LoginRequired);
        };
        let mut watch = WatchedAsteroid::new(member_id, neo.id.as_str());
        if let Some(notes) = notes {
            watch = watch.with_notes(notes);
        }
        self.neos.insert(neo.id.as_str(), neo.clone());
        self.watches.apply_create(watch).map(Prepared::Ready)
    }

    /// Apply the store's answer to a write started here
    pub fn settle(&mut self, mutation: MutationId, result: Result<()>) -> Option<MutationState> {
        self.watches.settle(mutation, result)
    }

    pub async fn toggle_alerts<S: RecordStore + ?Sized>(&mut self, store: &S, watch_id: &str) -> Option<MutationState> {
        let write = self.begin_toggle_alerts(watch_id)?;
        let result = write.send(store).await;
        self.settle(write.id, result)
    }

    pub async fn remove<S: RecordStore + ?Sized>(&mut self, store: &S, watch_id: &str) -> Option<MutationState> {
        let write = self.begin_remove(watch_id)?;
        let result = write.send(store).await;
        self.settle(write.id, result)
    }

    pub async fn add<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        identity: &dyn IdentityProvider,
        neo: &NearEarthObject,
        notes: Option<&str>,
    ) -> Submission {
        let write = match self.begin_add(identity, neo, notes) {
            Ok(Prepared::Ready(write)) => write,
            Ok(Prepared::LoginRequired) => return Submission::LoginRequired,
            Ok(Prepared::Incomplete) => return Submission::Incomplete,
            Err(e) => return Submission::Settled(MutationState::Failed(e)),
        };
        let result = write.send(store).await;
        Submission::Settled(self.settle(write.id, result).unwrap_or(MutationState::Applied))
    }

    pub fn retry(&mut self, watch_id: &str) -> Option<PendingWrite> {
        self.watches.retry(watch_id)
    }

    pub fn discard(&mut self, watch_id: &str) -> bool {
        self.watches.discard(watch_id)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        let failed = self.watches.take_notices();
        self.status.push_notices(failed);
        self.status.take_notices()
    }

    pub fn unmount(&mut self) {
        self.status.unmount();
    }
}
