//! Community discussion threads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Record;

/// Author id used when a post is made without a member id.
pub const ANONYMOUS_AUTHOR: &str = "anonymous";

/// A discussion post about one object.
///
/// Unlike watch entries, posts point at the object's catalog
/// `reference_id`, not its `_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityDiscussion {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neo_reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl Record for CommunityDiscussion {
    fn collection() -> &'static str {
        "communitydiscussions"
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl CommunityDiscussion {
    /// A new post stamped now, with a client-generated id.
    pub fn new(
        neo_reference_id: impl Into<String>,
        author_id: Option<&str>,
        subject: impl Into<String>,
        message_content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            neo_reference_id: Some(neo_reference_id.into()),
            author_id: Some(author_id.unwrap_or(ANONYMOUS_AUTHOR).to_string()),
            subject: Some(subject.into()),
            message_content: Some(message_content.into()),
            posted_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn is_by(&self, member_id: &str) -> bool {
        self.author_id.as_deref() == Some(member_id)
    }
}
