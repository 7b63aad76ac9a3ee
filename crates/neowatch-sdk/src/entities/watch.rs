//! Watchlist entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Record;

/// One member watching one object.
///
/// Nothing prevents two entries for the same `(user_id, neo_id)`; both are
/// kept and shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedAsteroid {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// `_id` of the watched [`NearEarthObject`](super::NearEarthObject)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub custom_alerts_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notification_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

impl Record for WatchedAsteroid {
    fn collection() -> &'static str {
        "watchedasteroids"
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl WatchedAsteroid {
    /// A new entry with a client-generated id, alerts off.
    pub fn new(user_id: impl Into<String>, neo_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: Some(user_id.into()),
            neo_id: Some(neo_id.into()),
            added_date: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.user_notes = Some(notes.into());
        self
    }

    pub fn belongs_to(&self, member_id: &str) -> bool {
        self.user_id.as_deref() == Some(member_id)
    }
}
