//! Filtered, sorted projections of the accumulated objects
//!
//! Everything here is a pure function of its inputs, safe to call on every
//! render. Projections cover only what has been accumulated so far, so a
//! later "load more" can bring in objects that match the current filter.

mod filter;
mod sort;

pub use filter::{FilterSpec, HazardFilter};
pub use sort::{date_key, sort_newest_first, SortKey};

use crate::entities::NearEarthObject;

/// Filter `entities`, then order the survivors by `sort`.
///
/// The sort is stable: objects with equal keys keep their arrival order.
pub fn project<'a>(
    entities: &'a [NearEarthObject],
    filter: &FilterSpec,
    sort: SortKey,
) -> Vec<&'a NearEarthObject> {
    let mut visible: Vec<&NearEarthObject> = entities.iter().filter(|neo| filter.matches(neo)).collect();
    visible.sort_by(|a, b| sort.compare(a, b));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scored(name: &str, risk: Option<f64>) -> NearEarthObject {
        NearEarthObject {
            id: name.to_lowercase(),
            name: Some(name.into()),
            risk_score: risk,
            ..Default::default()
        }
    }

    fn names<'a>(neos: &[&'a NearEarthObject]) -> Vec<&'a str> {
        neos.iter().map(|n| n.display_name()).collect()
    }

    #[test]
    fn test_search_narrows_before_sort() {
        let neos = vec![scored("Apophis", Some(8.1)), scored("Bennu", Some(9.0))];
        let result = project(&neos, &FilterSpec::new("Apophis", HazardFilter::All), SortKey::Risk);
        assert_eq!(names(&result), vec!["Apophis"]);
    }

    #[test]
    fn test_missing_distance_sorts_first() {
        let at = |id: &str, d: Option<f64>| NearEarthObject {
            id: id.into(),
            name: Some(id.into()),
            miss_distance: d,
            ..Default::default()
        };
        let neos = vec![at("far", Some(5_000_000.0)), at("unknown", None), at("near", Some(1_000_000.0))];

        let result = project(&neos, &FilterSpec::default(), SortKey::Distance);
        assert_eq!(names(&result), vec!["unknown", "near", "far"]);
    }

    #[test]
    fn test_risk_descending_with_missing_as_zero() {
        let neos = vec![scored("a", Some(2.0)), scored("b", None), scored("c", Some(7.5))];
        let result = project(&neos, &FilterSpec::default(), SortKey::Risk);
        assert_eq!(names(&result), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_date_descending_with_undated_last() {
        let at = |id: &str, year: Option<i32>| NearEarthObject {
            id: id.into(),
            name: Some(id.into()),
            next_close_approach_datetime: year.map(|y| Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let neos = vec![at("2029", Some(2029)), at("none", None), at("2036", Some(2036))];

        let result = project(&neos, &FilterSpec::default(), SortKey::Date);
        assert_eq!(names(&result), vec!["2036", "2029", "none"]);
    }

    #[test]
    fn test_equal_keys_keep_arrival_order() {
        let neos = vec![scored("first", Some(5.0)), scored("second", Some(5.0)), scored("third", Some(5.0))];
        let result = project(&neos, &FilterSpec::default(), SortKey::Risk);
        assert_eq!(names(&result), vec!["first", "second", "third"]);
    }
}
