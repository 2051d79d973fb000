use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ink_books::cache::{CacheEntry, CacheKind, CacheStore, CachedPayload, MemoryStore};
use ink_books::models::CanonicalRecord;
use ink_books::openlibrary::OpenLibraryClient;
use ink_books::services::detail;
use ink_books::state::AppState;

const WORK: &str = "/works/OL45883W";

fn setup_state(upstream_url: &str, timeout: Duration) -> (AppState, Arc<MemoryStore>) {
    let client = OpenLibraryClient::new(upstream_url, timeout).expect("Failed to build client");
    let store = Arc::new(MemoryStore::new());
    (AppState::new(client, store.clone()), store)
}

async fn mount_work(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{WORK}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_non_works_identifier_short_circuits_without_upstream() {
    let server = MockServer::start().await;
    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));

    let record = detail::detail(&state, "authors/OL18319A")
        .await
        .expect("degraded path must not fail");

    assert_eq!(record.id, "/authors/OL18319A");
    assert_eq!(record.title, "Book");
    assert_eq!(record.author, "Unknown author");
    assert_eq!(record.year, "");
    assert_eq!(record.cover, "");
    assert!(record.tags.is_empty());
    assert_eq!(record.desc, "No description available.");

    assert!(server.received_requests().await.unwrap().is_empty());
    // The degraded record is not cached either
    assert!(
        state
            .cache
            .get(CacheKind::Detail, "/authors/OL18319A")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_work_with_description_never_fetches_editions() {
    let server = MockServer::start().await;
    mount_work(
        &server,
        json!({
            "title": "Dune",
            "description": "Paul Atreides on Arrakis.",
            "covers": [44],
            "subjects": ["Science fiction"]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.desc, "Paul Atreides on Arrakis.");
}

#[tokio::test]
async fn test_structured_work_description_is_extracted_and_cleaned() {
    let server = MockServer::start().await;
    mount_work(
        &server,
        json!({
            "title": "Dune",
            "description": { "type": "/type/text", "value": "  Paul Atreides\u{FFFD} on Arrakis. " }
        }),
    )
    .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.desc, "Paul Atreides on Arrakis.");
}

#[tokio::test]
async fn test_editions_fallback_takes_first_candidate_by_field_priority() {
    let server = MockServer::start().await;
    mount_work(&server, json!({ "title": "Dune" })).await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                { "subtitle": "   " },
                { "notes": { "type": "/type/text", "value": "Notes of edition two" },
                  "subtitle": "Subtitle of edition two" },
                { "description": "Description of edition three" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();

    // Edition two is the first to yield anything; within it, notes outrank
    // the subtitle. Edition three is never considered.
    assert_eq!(record.desc, "Notes of edition two");
}

#[tokio::test]
async fn test_edition_string_description_outranks_notes() {
    let server = MockServer::start().await;
    mount_work(&server, json!({ "title": "Dune" })).await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                { "description": "Plain edition description", "notes": "Some notes" }
            ]
        })))
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.desc, "Plain edition description");
}

#[tokio::test]
async fn test_no_description_anywhere_yields_sentinel() {
    let server = MockServer::start().await;
    mount_work(&server, json!({ "title": "Dune" })).await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": [{}] })))
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.desc, "No description available.");
}

#[tokio::test]
async fn test_editions_timeout_degrades_to_sentinel_not_error() {
    let server = MockServer::start().await;
    mount_work(&server, json!({ "title": "Dune", "covers": [44] })).await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "entries": [] }))
                .set_delay(Duration::from_millis(700)),
        )
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_millis(200));
    let record = detail::detail(&state, WORK)
        .await
        .expect("editions failure must be absorbed");

    assert_eq!(record.title, "Dune");
    assert_eq!(record.desc, "No description available.");
}

#[tokio::test]
async fn test_editions_server_error_degrades_to_sentinel_not_error() {
    let server = MockServer::start().await;
    mount_work(&server, json!({ "title": "Dune" })).await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}/editions.json")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.desc, "No description available.");
}

#[tokio::test]
async fn test_primary_work_fetch_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}.json")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let err = detail::detail(&state, WORK).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_malformed_work_body_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let err = detail::detail(&state, WORK).await.unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[tokio::test]
async fn test_subjects_are_capped_at_eight_and_empty_filtered() {
    let server = MockServer::start().await;
    mount_work(
        &server,
        json!({
            "title": "Dune",
            "description": "d",
            "subjects": ["s1", " ", "s3", "s4", "s5", "s6", "s7", "\u{FFFD}", "s9", "s10"]
        }),
    )
    .await;

    let (state, _) = setup_state(&server.uri(), Duration::from_secs(2));
    let record = detail::detail(&state, WORK).await.unwrap();
    // First eight subjects considered, blanks dropped after normalization
    assert_eq!(record.tags, vec!["s1", "s3", "s4", "s5", "s6", "s7"]);
}

#[tokio::test]
async fn test_fresh_detail_entry_is_served_without_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "Dune" })))
        .expect(0)
        .mount(&server)
        .await;

    let (state, store) = setup_state(&server.uri(), Duration::from_secs(2));
    let mut cached = CanonicalRecord::degraded(WORK.to_string());
    cached.title = "Cached title".to_string();
    store
        .put_entry(
            CacheKind::Detail,
            WORK,
            CacheEntry {
                ts: chrono::Utc::now().timestamp() - 3599,
                payload: CachedPayload::Detail(cached.clone()),
            },
        )
        .await;

    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record, cached);
}

#[tokio::test]
async fn test_stale_detail_entry_triggers_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{WORK}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Dune",
            "description": "Fresh description"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (state, store) = setup_state(&server.uri(), Duration::from_secs(2));
    let mut cached = CanonicalRecord::degraded(WORK.to_string());
    cached.title = "Cached title".to_string();
    store
        .put_entry(
            CacheKind::Detail,
            WORK,
            CacheEntry {
                ts: chrono::Utc::now().timestamp() - 3601,
                payload: CachedPayload::Detail(cached),
            },
        )
        .await;

    let record = detail::detail(&state, WORK).await.unwrap();
    assert_eq!(record.title, "Dune");
    assert_eq!(record.desc, "Fresh description");
}
