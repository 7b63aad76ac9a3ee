//! Single object lookup

use crate::entities::NearEarthObject;
use crate::error::{Result, WatchError};
use crate::lifecycle::LoadOutcome;
use crate::notice::Notice;
use crate::store::{RecordStore, RecordStoreExt};

use super::{LoadTicket, ViewStatus, DASHBOARD_ROUTE};

const VIEW: &str = "object";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Found(Box<NearEarthObject>),
    /// No object under the requested id; `back_to` is the recovery route
    NotFound { back_to: &'static str },
    /// The lookup failed; the banner or a notice says why
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct NeoDetailView {
    id: String,
    state: DetailState,
    status: ViewStatus,
}

impl NeoDetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn neo(&self) -> Option<&NearEarthObject> {
        match &self.state {
            DetailState::Found(neo) => Some(neo.as_ref()),
            _ => None,
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// Point the view at another object and start loading it
    pub fn navigate(&mut self, id: impl Into<String>) -> LoadTicket {
        self.id = id.into();
        self.begin_load()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.state = DetailState::Loading;
        self.status.begin()
    }

    pub async fn fetch<S: RecordStore + ?Sized>(store: &S, id: &str) -> Result<Option<NearEarthObject>> {
        store.fetch_one::<NearEarthObject>(id).await
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Option<NearEarthObject>>) -> LoadOutcome {
        if !self.status.accept(ticket, VIEW) {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(Some(neo)) => {
                self.status.succeeded();
                self.state = DetailState::Found(Box::new(neo));
                LoadOutcome::Applied { received: 1 }
            }
            Ok(None) | Err(WatchError::NotFound(_)) => {
                self.status.succeeded();
                self.state = DetailState::NotFound {
                    back_to: DASHBOARD_ROUTE,
                };
                LoadOutcome::Applied { received: 0 }
            }
            Err(e) => {
                self.status.failed(VIEW, &e);
                self.state = DetailState::Unavailable;
                LoadOutcome::Failed(e)
            }
        }
    }

    pub async fn load<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = Self::fetch(store, &self.id).await;
        self.finish_load(ticket, result)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.status.take_notices()
    }

    pub fn unmount(&mut self) {
        self.status.unmount();
    }
}
