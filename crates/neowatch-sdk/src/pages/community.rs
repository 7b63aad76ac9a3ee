//! Discussion board

use crate::cache::{JoinIndex, JoinResolver, PaginationAccumulator};
use crate::config::PagingConfig;
use crate::entities::{CommunityDiscussion, NearEarthObject};
use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::lifecycle::LoadOutcome;
use crate::mutation::{MutationId, MutationState, OptimisticList, PendingWrite, Tracked};
use crate::notice::Notice;
use crate::store::{QueryFilter, RecordStore, RecordStoreExt};
use crate::view::sort_newest_first;

use super::{LoadTicket, Prepared, Submission, ViewStatus};

const VIEW: &str = "discussions";

#[derive(Debug, Clone, Default)]
pub struct CommunityData {
    /// Newest first
    pub discussions: Vec<CommunityDiscussion>,
    pub neos: JoinIndex<NearEarthObject>,
}

/// A discussion and, when its reference resolved, the object it is about
#[derive(Debug, Clone, Copy)]
pub struct CommunityRow<'a> {
    pub discussion: &'a Tracked<CommunityDiscussion>,
    pub neo: Option<&'a NearEarthObject>,
}

/// The post form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub subject: String,
    pub message: String,
    /// `reference_id` of the object picked in the pick-list
    pub neo_reference_id: String,
}

impl PostDraft {
    pub fn new(
        subject: impl Into<String>,
        message: impl Into<String>,
        neo_reference_id: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            neo_reference_id: neo_reference_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.subject.trim().is_empty()
            && !self.message.trim().is_empty()
            && !self.neo_reference_id.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CommunityView {
    discussions: OptimisticList<CommunityDiscussion>,
    neos: JoinIndex<NearEarthObject>,
    picklist: PaginationAccumulator<NearEarthObject>,
    page_size: u32,
    max_pages: u32,
    status: ViewStatus,
}

impl CommunityView {
    pub fn new(paging: &PagingConfig) -> Self {
        Self {
            discussions: OptimisticList::new(),
            neos: JoinIndex::default(),
            picklist: PaginationAccumulator::new(paging.picklist_page_size),
            page_size: paging.listing_page_size,
            max_pages: paging.max_pages,
            status: ViewStatus::default(),
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.status.begin()
    }

    /// Every discussion, newest first, with the objects they reference
    /// looked up by `reference_id`.
    pub async fn fetch<S: RecordStore + ?Sized>(store: &S, page_size: u32, max_pages: u32) -> Result<CommunityData> {
        let mut discussions: Vec<CommunityDiscussion> = store
            .fetch_all(&QueryFilter::new(), page_size, max_pages)
            .await?;
        sort_newest_first(&mut discussions);

        let neos = JoinResolver::new(store, page_size, max_pages)
            .resolve(&discussions)
            .await?;
        Ok(CommunityData { discussions, neos })
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<CommunityData>) -> LoadOutcome {
        if !self.status.accept(ticket, VIEW) {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(data) => {
                let received = data.discussions.len();
                self.discussions.replace_all(data.discussions);
                self.neos = data.neos;
                self.status.succeeded();
                LoadOutcome::Applied { received }
            }
            Err(e) => {
                self.status.failed(VIEW, &e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Load the discussions, then the first pick-list page.
    pub async fn load<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = Self::fetch(store, self.page_size, self.max_pages).await;
        let outcome = self.finish_load(ticket, result);
        self.load_picklist(store).await;
        outcome
    }

    pub async fn load_picklist<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let outcome = self.picklist.load_initial(store).await;
        if let LoadOutcome::Failed(e) = &outcome {
            self.status.failed("pick-list", e);
        }
        outcome
    }

    pub async fn load_more_picklist<S: RecordStore + ?Sized>(&mut self, store: &S) -> LoadOutcome {
        let outcome = self.picklist.load_more(store).await;
        if let LoadOutcome::Failed(e) = &outcome {
            self.status.failed("pick-list", e);
        }
        outcome
    }

    /// Objects offered when starting a discussion
    pub fn picklist(&self) -> &[NearEarthObject] {
        self.picklist.items()
    }

    /// Every discussion, resolved or not. A reference that did not resolve
    /// leaves `neo` empty.
    pub fn rows(&self) -> Vec<CommunityRow<'_>> {
        self.discussions
            .entries()
            .iter()
            .map(|discussion| CommunityRow {
                discussion,
                neo: self.neos.resolve(&discussion.record),
            })
            .collect()
    }

    /// A create is waiting on the store
    pub fn is_submitting(&self) -> bool {
        self.discussions.has_pending_create()
    }

    /// Check the draft and put the post at the top of the board.
    pub fn prepare_post(&mut self, identity: &dyn IdentityProvider, draft: &PostDraft) -> Result<Prepared> {
        if !identity.is_authenticated() {
            identity.login();
            return Ok(Prepared::LoginRequired);
        }
        if !draft.is_complete() {
            return Ok(Prepared::Incomplete);
        }

        let author = identity.member_id();
        let post = CommunityDiscussion::new(
            draft.neo_reference_id.as_str(),
            author.as_deref(),
            draft.subject.as_str(),
            draft.message.as_str(),
        );
        if let Some(neo) = self
            .picklist
            .items()
            .iter()
            .find(|n| n.reference_id.as_deref() == Some(draft.neo_reference_id.as_str()))
        {
            self.neos.insert(draft.neo_reference_id.as_str(), neo.clone());
        }
        self.discussions.apply_create(post).map(Prepared::Ready)
    }

    pub fn settle(&mut self, mutation: MutationId, result: Result<()>) -> Option<MutationState> {
        self.discussions.settle(mutation, result)
    }

    pub async fn post<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        identity: &dyn IdentityProvider,
        draft: &PostDraft,
    ) -> Submission {
        let write = match self.prepare_post(identity, draft) {
            Ok(Prepared::Ready(write)) => write,
            Ok(Prepared::LoginRequired) => return Submission::LoginRequired,
            Ok(Prepared::Incomplete) => return Submission::Incomplete,
            Err(e) => return Submission::Settled(MutationState::Failed(e)),
        };
        let result = write.send(store).await;
        Submission::Settled(self.settle(write.id, result).unwrap_or(MutationState::Applied))
    }

    /// Re-send a post the store refused
    pub fn retry(&mut self, discussion_id: &str) -> Option<PendingWrite> {
        self.discussions.retry(discussion_id)
    }

    pub fn discard(&mut self, discussion_id: &str) -> bool {
        self.discussions.discard(discussion_id)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        let failed = self.discussions.take_notices();
        self.status.push_notices(failed);
        self.status.take_notices()
    }

    pub fn unmount(&mut self) {
        self.status.unmount();
        self.picklist.reset();
    }
}
