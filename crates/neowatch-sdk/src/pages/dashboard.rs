//! Object listing with search, hazard filter and sort

use crate::cache::PaginationAccumulator;
use crate::config::PagingConfig;
use crate::entities::{NearEarthObject, WatchedAsteroid};
use crate::identity::IdentityProvider;
use crate::lifecycle::LoadOutcome;
use crate::mutation::{MutationState, OptimisticList};
use crate::notice::Notice;
use crate::store::RecordStore;
use crate::view::{project, FilterSpec, HazardFilter, SortKey};

use super::{Submission, ViewStatus};

const VIEW: &str = "dashboard";

#[derive(Debug, Clone)]
pub struct DashboardView {
    neos: PaginationAccumulator<NearEarthObject>,
    filter: FilterSpec,
    sort: SortKey,
    added: OptimisticList<WatchedAsteroid>,
    status: ViewStatus,
}

impl DashboardView {
    pub fn new(paging: &PagingConfig) -> Self {
        Self {
            neos: PaginationAccumulator::new(paging.listing_page_size),
            filter: FilterSpec::default(),
            sort: SortKey::default(),
            added: OptimisticList::new(),
            status: ViewStatus::default(),
        }
    }

    pub fn accumulator(&self) -> &PaginationAccumulator<NearEarthObject> {
        &self.neos
    }

    pub fn accumulator_mut(&mut self) -> &mut PaginationAccumulator<NearEarthObject> {
        &mut self.neos
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_hazard(&mut self, hazard: HazardFilter) {
        self.filter.hazard = hazard;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Accumulated objects through the current filter and sort
    pub fn visible(&self) -> Vec<&NearEarthObject> {
        project(self.neos.items(), &self.filter, self.sort)
    }

    pub fn is_loading(&self) -> bool {
        self.neos.is_loading()
    }

    pub fn can_load_more(&self) -> bool {
        self.neos.can_load_more()
    }

    pub async fn load_initial<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let outcome = self.neos.load_initial(store).await;
        self.record(&outcome);
        outcome
    }

    /// Next page; a no-op while a load is in flight or after the last page
    pub async fn load_more<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let outcome = self.neos.load_more(store).await;
        self.record(&outcome);
        outcome
    }

    fn record(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Applied { .. } => self.status.succeeded(),
            LoadOutcome::Failed(e) => self.status.failed(VIEW, e),
            _ => {}
        }
    }

    /// Watch `neo` for the signed-in member.
    pub async fn add_to_watchlist<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        identity: &dyn IdentityProvider,
        neo: &NearEarthObject,
    ) -> Submission {
        let Some(member_id) = identity.member_id().filter(|_| identity.is_authenticated()) else {
            identity.login();
            return Submission::LoginRequired;
        };
        match self.added.create(store, WatchedAsteroid::new(member_id, neo.id.as_str())).await {
            Ok(state) => Submission::Settled(state),
            Err(e) => Submission::Settled(MutationState::Failed(e)),
        }
    }

    /// Whether a watch was added for `neo_id` from this view
    pub fn was_added(&self, neo_id: &str) -> bool {
        self.added
            .records()
            .any(|w| w.neo_id.as_deref() == Some(neo_id))
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        let added = self.added.take_notices();
        self.status.push_notices(added);
        self.status.take_notices()
    }

    /// Leave the view; loads still in flight are dropped when they land.
    pub fn unmount(&mut self) {
        self.neos.reset();
        self.status.unmount();
    }
}
