//! Orderings over objects and discussions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::entities::{CommunityDiscussion, NearEarthObject};
use crate::error::WatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Next close approach, latest first; undated objects last
    #[default]
    Date,
    /// Risk score, highest first; missing score counts as 0
    Risk,
    /// Miss distance, closest first; missing distance counts as 0
    Distance,
}

impl SortKey {
    pub fn compare(&self, a: &NearEarthObject, b: &NearEarthObject) -> Ordering {
        match self {
            Self::Date => date_key(b.next_close_approach_datetime)
                .cmp(&date_key(a.next_close_approach_datetime)),
            Self::Risk => b.risk_score.unwrap_or(0.0).total_cmp(&a.risk_score.unwrap_or(0.0)),
            Self::Distance => a
                .miss_distance
                .unwrap_or(0.0)
                .total_cmp(&b.miss_distance.unwrap_or(0.0)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Risk => "risk",
            Self::Distance => "distance",
        }
    }
}

impl FromStr for SortKey {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "risk" => Ok(Self::Risk),
            "distance" => Ok(Self::Distance),
            other => Err(WatchError::Validation(format!("unknown sort key: {}", other))),
        }
    }
}

/// Milliseconds since the epoch; a missing date is the epoch itself.
pub fn date_key(date: Option<DateTime<Utc>>) -> i64 {
    date.map_or(0, |d| d.timestamp_millis())
}

/// Newest post first; undated posts sink to the end.
pub fn sort_newest_first(discussions: &mut [CommunityDiscussion]) {
    discussions.sort_by(|a, b| date_key(b.posted_at).cmp(&date_key(a.posted_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sort_keys_parse() {
        assert_eq!("risk".parse::<SortKey>().unwrap(), SortKey::Risk);
        assert_eq!(SortKey::default(), SortKey::Date);
        assert!("size".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_undated_discussions_last() {
        let at = |id: &str, day: Option<u32>| CommunityDiscussion {
            id: id.into(),
            posted_at: day.map(|d| Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()),
            ..Default::default()
        };
        let mut posts = vec![at("old", Some(1)), at("none", None), at("new", Some(9))];
        sort_newest_first(&mut posts);

        let order: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "none"]);
    }
}
