//! Near-Earth Object records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Record;

/// A tracked Near-Earth Object.
///
/// Read-only from the client's point of view. `reference_id` is the external
/// catalog key and is unrelated to the store-assigned `id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearEarthObject {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdDate", default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedDate", default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_diameter_min: Option<f64>,
    /// km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_diameter_max: Option<f64>,
    /// km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_velocity: Option<f64>,
    /// km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub is_hazardous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_close_approach_datetime: Option<DateTime<Utc>>,
}

impl Record for NearEarthObject {
    fn collection() -> &'static str {
        "nearearthobjects"
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Risk bucket shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
    /// No score, or a zero score
    Unknown,
}

impl RiskLevel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Self::Unknown,
            Some(s) if s == 0.0 || s.is_nan() => Self::Unknown,
            Some(s) if s >= 7.0 => Self::High,
            Some(s) if s >= 4.0 => Self::Moderate,
            Some(_) => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Moderate => "Moderate Risk",
            Self::Low => "Low Risk",
            Self::Unknown => "Unknown",
        }
    }
}

impl NearEarthObject {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }

    /// Mean of the diameter bounds, when both are known and non-zero.
    pub fn average_diameter_km(&self) -> Option<f64> {
        match (self.estimated_diameter_min, self.estimated_diameter_max) {
            (Some(min), Some(max)) if min != 0.0 && max != 0.0 => Some((min + max) / 2.0),
            _ => None,
        }
    }

    /// Miss distance in millions of km.
    pub fn miss_distance_million_km(&self) -> Option<f64> {
        self.miss_distance
            .filter(|d| *d != 0.0)
            .map(|d| d / 1_000_000.0)
    }

    /// Name for display, falling back when the record has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}
