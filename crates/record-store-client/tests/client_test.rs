//! HTTP mapping tests against a mock record store

use record_store_client::{ListOptions, StoreClient, StoreConfig, StoreError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoreClient {
    StoreClient::new(StoreConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .expect("client builds")
}

#[tokio::test]
async fn test_list_items_passes_paging_and_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/watchedasteroids/items"))
        .and(query_param("limit", "12"))
        .and(query_param("skip", "12"))
        .and(query_param("filter", r#"{"userId":"member-1"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"_id": "w-1", "userId": "member-1", "neoId": "neo-1"}],
            "hasNext": true,
            "nextSkip": 24
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .list_items(
            "watchedasteroids",
            ListOptions::paged(12, 12).with_eq("userId", "member-1"),
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(page.has_next);
    assert_eq!(page.next_skip, Some(24));
}

#[tokio::test]
async fn test_get_item_missing_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/nearearthobjects/items/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let item = client.get_item("nearearthobjects", "missing").await.unwrap();
    assert!(item.is_none());
}

#[tokio::test]
async fn test_create_item_posts_json() {
    let server = MockServer::start().await;
    let record = json!({"_id": "d-1", "subject": "Close pass", "neoReferenceId": "2099942"});

    Mock::given(method("POST"))
        .and(path("/collections/communitydiscussions/items"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(201).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stored = client
        .create_item("communitydiscussions", &record)
        .await
        .unwrap();
    assert_eq!(stored["_id"], "d-1");
}

#[tokio::test]
async fn test_update_item_patches_partial_record() {
    let server = MockServer::start().await;
    let patch = json!({"_id": "w-1", "customAlertsEnabled": true});

    Mock::given(method("PATCH"))
        .and(path("/collections/watchedasteroids/items/w-1"))
        .and(body_json(&patch))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "w-1",
            "neoId": "neo-1",
            "customAlertsEnabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stored = client
        .update_item("watchedasteroids", "w-1", &patch)
        .await
        .unwrap();
    assert_eq!(stored["customAlertsEnabled"], true);
}

#[tokio::test]
async fn test_delete_item_reports_existence() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/collections/watchedasteroids/items/w-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/collections/watchedasteroids/items/w-2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.delete_item("watchedasteroids", "w-1").await.unwrap());
    assert!(!client.delete_item("watchedasteroids", "w-2").await.unwrap());
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/nearearthobjects/items"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .list_items("nearearthobjects", ListOptions::default())
        .await
        .unwrap_err();

    match err {
        StoreError::Server { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_key_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/nearearthobjects/items/neo-1"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "neo-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = StoreClient::new(StoreConfig {
        base_url: server.uri(),
        api_key: Some("secret".into()),
        ..Default::default()
    })
    .unwrap();

    let item = client.get_item("nearearthobjects", "neo-1").await.unwrap();
    assert!(item.is_some());
}
