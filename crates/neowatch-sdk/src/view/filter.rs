//! User-controlled predicates over the accumulated objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::NearEarthObject;
use crate::error::WatchError;

/// Hazard tri-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardFilter {
    #[default]
    All,
    #[serde(rename = "hazardous")]
    HazardousOnly,
    #[serde(rename = "safe")]
    SafeOnly,
}

impl HazardFilter {
    pub fn matches(&self, neo: &NearEarthObject) -> bool {
        match self {
            Self::All => true,
            Self::HazardousOnly => neo.is_hazardous,
            Self::SafeOnly => !neo.is_hazardous,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::HazardousOnly => "hazardous",
            Self::SafeOnly => "safe",
        }
    }
}

impl FromStr for HazardFilter {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "hazardous" => Ok(Self::HazardousOnly),
            "safe" => Ok(Self::SafeOnly),
            other => Err(WatchError::Validation(format!("unknown hazard filter: {}", other))),
        }
    }
}

/// Search text AND hazard state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring of `name` or `reference_id`; empty matches all
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hazard: HazardFilter,
}

impl FilterSpec {
    pub fn new(search: impl Into<String>, hazard: HazardFilter) -> Self {
        Self {
            search: search.into(),
            hazard,
        }
    }

    pub fn matches(&self, neo: &NearEarthObject) -> bool {
        self.matches_search(neo) && self.hazard.matches(neo)
    }

    fn matches_search(&self, neo: &NearEarthObject) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        contains(&neo.name) || contains(&neo.reference_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neo(name: &str, reference: &str, hazardous: bool) -> NearEarthObject {
        NearEarthObject {
            id: name.to_lowercase(),
            name: Some(name.into()),
            reference_id: Some(reference.into()),
            is_hazardous: hazardous,
            ..Default::default()
        }
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_reference() {
        let apophis = neo("99942 Apophis", "2099942", true);
        assert!(FilterSpec::new("apoPHIS", HazardFilter::All).matches(&apophis));
        assert!(FilterSpec::new("20999", HazardFilter::All).matches(&apophis));
        assert!(!FilterSpec::new("bennu", HazardFilter::All).matches(&apophis));
        assert!(FilterSpec::default().matches(&apophis));
    }

    #[test]
    fn test_hazard_tristate() {
        let risky = neo("Apophis", "1", true);
        let calm = neo("Eros", "2", false);

        assert!(HazardFilter::HazardousOnly.matches(&risky));
        assert!(!HazardFilter::HazardousOnly.matches(&calm));
        assert!(HazardFilter::SafeOnly.matches(&calm));
        assert!(!HazardFilter::SafeOnly.matches(&risky));
        assert!(HazardFilter::All.matches(&risky) && HazardFilter::All.matches(&calm));
    }

    #[test]
    fn test_predicates_are_anded() {
        let calm = neo("Apophis twin", "3", false);
        assert!(!FilterSpec::new("apophis", HazardFilter::HazardousOnly).matches(&calm));
    }

    #[test]
    fn test_parse_select_values() {
        assert_eq!("safe".parse::<HazardFilter>().unwrap(), HazardFilter::SafeOnly);
        assert!("nope".parse::<HazardFilter>().is_err());
    }
}
