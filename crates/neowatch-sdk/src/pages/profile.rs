//! Member profile summary

use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;
use crate::entities::{CommunityDiscussion, WatchedAsteroid};
use crate::error::Result;
use crate::identity::{require_member, IdentityProvider, Member, ViewAccess};
use crate::lifecycle::LoadOutcome;
use crate::notice::Notice;
use crate::store::{QueryFilter, RecordStore, RecordStoreExt};

use super::{LoadTicket, ViewStatus, PROFILE_SIGN_IN};

const VIEW: &str = "profile";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub watched_count: usize,
    pub discussion_count: usize,
}

#[derive(Debug, Clone)]
pub struct ProfileView {
    access: ViewAccess,
    member: Option<Member>,
    stats: ProfileStats,
    page_size: u32,
    max_pages: u32,
    status: ViewStatus,
}

impl ProfileView {
    pub fn new(paging: &PagingConfig) -> Self {
        Self {
            access: ViewAccess::Granted,
            member: None,
            stats: ProfileStats::default(),
            page_size: paging.listing_page_size,
            max_pages: paging.max_pages,
            status: ViewStatus::default(),
        }
    }

    pub fn access(&self) -> &ViewAccess {
        &self.access
    }

    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    pub fn stats(&self) -> ProfileStats {
        self.stats
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn begin_load(&mut self, identity: &dyn IdentityProvider) -> Option<LoadTicket> {
        self.access = require_member(identity, PROFILE_SIGN_IN);
        self.member = match self.access {
            ViewAccess::Granted => identity.member(),
            ViewAccess::SignInRequired { .. } => None,
        };
        if self.member.is_none() {
            self.stats = ProfileStats::default();
            return None;
        }
        Some(self.status.begin())
    }

    /// Count the member's watches and authored discussions.
    pub async fn fetch<S: RecordStore + ?Sized>(
        store: &S,
        member_id: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<ProfileStats> {
        let watches: Vec<WatchedAsteroid> = store
            .fetch_all(&QueryFilter::new().eq("userId", member_id), page_size, max_pages)
            .await?;
        let discussions: Vec<CommunityDiscussion> = store
            .fetch_all(&QueryFilter::new().eq("authorId", member_id), page_size, max_pages)
            .await?;

        Ok(ProfileStats {
            watched_count: watches.iter().filter(|w| w.belongs_to(member_id)).count(),
            discussion_count: discussions.iter().filter(|d| d.is_by(member_id)).count(),
        })
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<ProfileStats>) -> LoadOutcome {
        if !self.status.accept(ticket, VIEW) {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(stats) => {
                self.stats = stats;
                self.status.succeeded();
                LoadOutcome::Applied {
                    received: stats.watched_count + stats.discussion_count,
                }
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
        let member_id = self.member.as_ref().map(|m| m.id.clone()).unwrap_or_default();
        let result = Self::fetch(store, &member_id, self.page_size, self.max_pages).await;
        self.finish_load(ticket, result)
    }

    /// Sign out through the identity provider and forget the member.
    pub fn sign_out(&mut self, identity: &dyn IdentityProvider) {
        identity.logout();
        self.member = None;
        self.stats = ProfileStats::default();
        self.status.unmount();
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.status.take_notices()
    }

    pub fn unmount(&mut self) {
        self.status.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use crate::store::InMemoryRecordStore;

    #[tokio::test]
    async fn test_counts_only_own_records() {
        let store = InMemoryRecordStore::new()
            .with_records(&[
                WatchedAsteroid::new("m-1", "n-1"),
                WatchedAsteroid::new("m-1", "n-2"),
                WatchedAsteroid::new("m-2", "n-1"),
            ])
            .unwrap()
            .with_records(&[
                CommunityDiscussion::new("r-1", Some("m-1"), "s", "m"),
                CommunityDiscussion::new("r-1", None, "s", "m"),
            ])
            .unwrap();
        let identity = StaticIdentity::signed_in(Member::new("m-1"));
        let mut view = ProfileView::new(&PagingConfig::default());

        assert!(view.load(&store, &identity).await.is_applied());
        assert_eq!(
            view.stats(),
            ProfileStats {
                watched_count: 2,
                discussion_count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_profile() {
        let store = InMemoryRecordStore::new();
        let identity = StaticIdentity::signed_in(Member::new("m-1"));
        let mut view = ProfileView::new(&PagingConfig::default());
        view.load(&store, &identity).await;

        view.sign_out(&identity);
        assert!(view.member().is_none());
        assert_eq!(view.load(&store, &identity).await, LoadOutcome::SignInRequired);
    }
}
