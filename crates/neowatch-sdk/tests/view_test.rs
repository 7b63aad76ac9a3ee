//! Filter and sort projections

use chrono::{TimeZone, Utc};
use neowatch_sdk::view::date_key;
use neowatch_sdk::{project, FilterSpec, HazardFilter, NearEarthObject, SortKey};

fn catalog() -> Vec<NearEarthObject> {
    let neo = |id: &str, name: &str, hazardous: bool, risk: Option<f64>, miss: Option<f64>, year: Option<i32>| {
        NearEarthObject {
            id: id.into(),
            name: Some(name.into()),
            reference_id: Some(format!("ref-{}", id)),
            is_hazardous: hazardous,
            risk_score: risk,
            miss_distance: miss,
            next_close_approach_datetime: year.map(|y| Utc.with_ymd_and_hms(y, 4, 13, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    };
    vec![
        neo("1", "Apophis", true, Some(8.1), Some(38_000.0), Some(2029)),
        neo("2", "Bennu", true, Some(9.0), Some(750_000.0), Some(2182)),
        neo("3", "Eros", false, Some(1.2), Some(22_000_000.0), None),
        neo("4", "Didymos", false, None, None, Some(2123)),
        neo("5", "Toutatis", true, Some(4.4), Some(7_000_000.0), Some(2069)),
    ]
}

fn names<'a>(result: &[&'a NearEarthObject]) -> Vec<&'a str> {
    result.iter().map(|n| n.display_name()).collect()
}

#[test]
fn test_search_narrows_before_risk_sort() {
    let neos = vec![
        NearEarthObject {
            id: "a".into(),
            name: Some("Apophis".into()),
            risk_score: Some(8.1),
            ..Default::default()
        },
        NearEarthObject {
            id: "b".into(),
            name: Some("Bennu".into()),
            risk_score: Some(9.0),
            ..Default::default()
        },
    ];
    let result = project(&neos, &FilterSpec::new("Apophis", HazardFilter::All), SortKey::Risk);
    assert_eq!(names(&result), vec!["Apophis"]);
}

#[test]
fn test_distance_missing_sorts_first() {
    let at = |id: &str, miss: Option<f64>| NearEarthObject {
        id: id.into(),
        name: Some(id.into()),
        miss_distance: miss,
        ..Default::default()
    };
    let neos = vec![at("far", Some(5_000_000.0)), at("undefined", None), at("near", Some(1_000_000.0))];

    let result = project(&neos, &FilterSpec::default(), SortKey::Distance);
    assert_eq!(names(&result), vec!["undefined", "near", "far"]);
}

#[test]
fn test_projection_has_no_hidden_state() {
    let neos = catalog();
    let filter = FilterSpec::new("o", HazardFilter::All);

    for sort in [SortKey::Date, SortKey::Risk, SortKey::Distance] {
        let first: Vec<String> = project(&neos, &filter, sort).iter().map(|n| n.id.clone()).collect();
        let second: Vec<String> = project(&neos, &filter, sort).iter().map(|n| n.id.clone()).collect();
        assert_eq!(first, second);
    }
}

#[test]
fn test_every_sort_key_is_monotonic() {
    let neos = catalog();
    let filter = FilterSpec::default();

    let by_risk = project(&neos, &filter, SortKey::Risk);
    for pair in by_risk.windows(2) {
        assert!(pair[0].risk_score.unwrap_or(0.0) >= pair[1].risk_score.unwrap_or(0.0));
    }

    let by_date = project(&neos, &filter, SortKey::Date);
    for pair in by_date.windows(2) {
        assert!(date_key(pair[0].next_close_approach_datetime) >= date_key(pair[1].next_close_approach_datetime));
    }

    let by_distance = project(&neos, &filter, SortKey::Distance);
    for pair in by_distance.windows(2) {
        assert!(pair[0].miss_distance.unwrap_or(0.0) <= pair[1].miss_distance.unwrap_or(0.0));
    }
}

#[test]
fn test_hazard_filter_with_search() {
    let neos = catalog();

    let hazardous = project(&neos, &FilterSpec::new("", HazardFilter::HazardousOnly), SortKey::Risk);
    assert_eq!(names(&hazardous), vec!["Bennu", "Apophis", "Toutatis"]);

    let safe = project(&neos, &FilterSpec::new("", HazardFilter::SafeOnly), SortKey::Date);
    assert_eq!(names(&safe), vec!["Didymos", "Eros"]);

    let by_reference = project(&neos, &FilterSpec::new("REF-3", HazardFilter::All), SortKey::Date);
    assert_eq!(names(&by_reference), vec!["Eros"]);
}

#[test]
fn test_projection_leaves_input_untouched() {
    let neos = catalog();
    let before: Vec<String> = neos.iter().map(|n| n.id.clone()).collect();
    let _ = project(&neos, &FilterSpec::default(), SortKey::Distance);
    let after: Vec<String> = neos.iter().map(|n| n.id.clone()).collect();
    assert_eq!(before, after);
}
