//! Page accumulation against the in-memory store

use neowatch_sdk::config::PagingConfig;
use neowatch_sdk::{
    DashboardView, InMemoryRecordStore, LoadOutcome, NearEarthObject, PaginationAccumulator,
    RecordStoreExt, StoreOp, WatchError,
};
use std::collections::HashSet;

fn neos(count: usize) -> Vec<NearEarthObject> {
    (0..count)
        .map(|i| NearEarthObject {
            id: format!("neo-{:03}", i),
            name: Some(format!("Object {}", i)),
            ..Default::default()
        })
        .collect()
}

fn ids(items: &[NearEarthObject]) -> Vec<&str> {
    items.iter().map(|n| n.id.as_str()).collect()
}

#[tokio::test]
async fn test_second_page_appends_in_order() {
    let all = neos(30);
    let store = InMemoryRecordStore::new().with_records(&all).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(12);

    assert_eq!(acc.load_initial(&store).await, LoadOutcome::Applied { received: 12 });
    assert!(acc.has_next());
    assert_eq!(acc.next_offset(), 12);

    assert_eq!(acc.load_more(&store).await, LoadOutcome::Applied { received: 12 });
    assert_eq!(acc.len(), 24);
    assert_eq!(ids(acc.items()), ids(&all[..24]));
}

#[tokio::test]
async fn test_following_cursors_is_monotonic_without_duplicates() {
    let store = InMemoryRecordStore::new().with_records(&neos(41)).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(12);

    let mut previous = 0;
    let mut received_total = 0;
    let mut outcome = acc.load_initial(&store).await;
    while let LoadOutcome::Applied { received } = outcome {
        received_total += received;
        assert!(acc.len() >= previous);
        assert_eq!(acc.len(), received_total);
        previous = acc.len();
        outcome = acc.load_more(&store).await;
    }

    assert_eq!(outcome, LoadOutcome::Skipped);
    assert_eq!(acc.len(), 41);
    assert!(acc.is_exhausted());
    let distinct: HashSet<_> = acc.items().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(distinct.len(), 41);
}

#[tokio::test]
async fn test_exhausted_accumulator_issues_no_requests() {
    let store = InMemoryRecordStore::new().with_records(&neos(5)).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(12);
    acc.load_initial(&store).await;
    let calls = store.call_count(StoreOp::GetAll);

    assert_eq!(acc.load_more(&store).await, LoadOutcome::Skipped);
    assert_eq!(acc.load_more(&store).await, LoadOutcome::Skipped);
    assert_eq!(store.call_count(StoreOp::GetAll), calls);
}

#[tokio::test]
async fn test_double_load_more_appends_once() {
    let store = InMemoryRecordStore::new().with_records(&neos(30)).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(12);
    acc.load_initial(&store).await;

    // Two clicks before the first page lands
    let first = acc.begin_load_more().expect("first click starts a load");
    assert!(acc.begin_load_more().is_none());

    let page = store.fetch_page::<NearEarthObject>(&Default::default(), first.request).await;
    acc.complete(first, page);
    assert_eq!(acc.len(), 24);
}

#[tokio::test]
async fn test_load_after_unmount_is_dropped() {
    let store = InMemoryRecordStore::new().with_records(&neos(30)).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(12);

    let ticket = acc.begin_initial();
    let page = store.fetch_page::<NearEarthObject>(&Default::default(), ticket.request).await;
    acc.reset();

    assert_eq!(acc.complete(ticket, page), LoadOutcome::Stale);
    assert!(acc.is_empty());
}

#[tokio::test]
async fn test_dashboard_failure_keeps_items_and_shows_banner() {
    let store = InMemoryRecordStore::new().with_records(&neos(30)).unwrap();
    let mut view = DashboardView::new(&PagingConfig::default());
    view.load_initial(&store).await;

    store.fail(StoreOp::GetAll, WatchError::Network("offline".into())).await;
    let outcome = view.load_more(&store).await;
    assert!(matches!(outcome, LoadOutcome::Failed(WatchError::Network(_))));
    assert_eq!(view.visible().len(), 12);
    assert!(view.status().banner().is_some());

    store.clear_failure(StoreOp::GetAll).await;
    assert!(view.load_more(&store).await.is_applied());
    assert_eq!(view.visible().len(), 24);
    assert!(view.status().banner().is_none());
}

#[tokio::test]
async fn test_picklist_page_size_from_config() {
    let paging = PagingConfig::default();
    let store = InMemoryRecordStore::new().with_records(&neos(30)).unwrap();
    let mut acc = PaginationAccumulator::<NearEarthObject>::new(paging.picklist_page_size);

    acc.load_initial(&store).await;
    assert_eq!(acc.len(), 20);
}
