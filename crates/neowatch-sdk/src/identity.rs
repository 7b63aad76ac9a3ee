//! Member identity
//!
//! Authentication is delegated to an external provider. Views only ask who
//! the current member is and, when an action needs a member, request a
//! login redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::RwLock;

/// The signed-in member as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_email: Option<String>,
    #[serde(default)]
    pub login_email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_date: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Source of the current member and authentication state.
///
/// `login` and `logout` start a redirect and return immediately.
pub trait IdentityProvider: Send + Sync {
    fn member(&self) -> Option<Member>;

    fn is_authenticated(&self) -> bool;

    /// Whether the provider is still resolving the session
    fn is_loading(&self) -> bool;

    fn login(&self);

    fn logout(&self);

    fn member_id(&self) -> Option<String> {
        self.member().map(|m| m.id)
    }
}

/// Whether a member-only view may load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAccess {
    Granted,
    SignInRequired { message: String },
}

/// Gate a member-only view on the provider's state.
pub fn require_member(identity: &dyn IdentityProvider, message: &str) -> ViewAccess {
    if identity.is_authenticated() && identity.member().is_some() {
        ViewAccess::Granted
    } else {
        ViewAccess::SignInRequired {
            message: message.to_string(),
        }
    }
}

/// Identity provider with settable state.
///
/// Records login and logout requests instead of redirecting; hosts that
/// resolve sessions themselves can drive it directly.
pub struct StaticIdentity {
    member: RwLock<Option<Member>>,
    loading: AtomicBool,
    login_requests: AtomicU32,
    logout_requests: AtomicU32,
}

impl StaticIdentity {
    pub fn anonymous() -> Self {
        Self {
            member: RwLock::new(None),
            loading: AtomicBool::new(false),
            login_requests: AtomicU32::new(0),
            logout_requests: AtomicU32::new(0),
        }
    }

    pub fn signed_in(member: Member) -> Self {
        let identity = Self::anonymous();
        identity.set_member(Some(member));
        identity
    }

    pub fn set_member(&self, member: Option<Member>) {
        if let Ok(mut current) = self.member.write() {
            *current = member;
        }
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    pub fn login_requests(&self) -> u32 {
        self.login_requests.load(Ordering::SeqCst)
    }

    pub fn logout_requests(&self) -> u32 {
        self.logout_requests.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for StaticIdentity {
    fn member(&self) -> Option<Member> {
        self.member.read().ok().and_then(|m| m.clone())
    }

    fn is_authenticated(&self) -> bool {
        self.member().is_some()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn login(&self) {
        self.login_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn logout(&self) {
        self.logout_requests.fetch_add(1, Ordering::SeqCst);
        self.set_member(None);
    }
}
