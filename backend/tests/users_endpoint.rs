//! End-to-end coverage for `/users` against a stubbed random-user API and a
//! snapshot file in a temporary directory.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header::HeaderName;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roster::Trace;
use roster::domain::{FanOutAggregator, FanOutConfig, UserStatsService};
use roster::inbound::http::state::HttpState;
use roster::inbound::http::users::{FAILED_FETCHES_HEADER, USERS_SOURCE_HEADER, list_users};
use roster::outbound::randomuser::RandomUserHttpSource;
use roster::outbound::snapshot::FileSnapshotStore;

const BATCH: usize = 4;

struct Harness {
    upstream: MockServer,
    _dir: TempDir,
    snapshot: PathBuf,
}

async fn harness() -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("users_cache.json");
    Harness {
        upstream: MockServer::start().await,
        _dir: dir,
        snapshot,
    }
}

fn batch_body(tag: &str, size: usize) -> Value {
    let results: Vec<Value> = (0..size)
        .map(|i| {
            json!({
                "gender": if i % 2 == 0 { "female" } else { "male" },
                "name": { "title": "Mx", "first": format!("First{tag}{i}"), "last": "Tester" },
                "email": format!("user{tag}{i}@example.com"),
                "location": { "city": "Galway", "country": "Ireland" },
                "login": { "uuid": format!("{tag}-{i}") }
            })
        })
        .collect();
    json!({ "results": results })
}

fn users_mock(body: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("results", BATCH.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

fn http_state(upstream: &MockServer, snapshot: &Path) -> web::Data<HttpState> {
    let endpoint = Url::parse(&format!("{}/api/", upstream.uri())).expect("mock server URL");
    let source = RandomUserHttpSource::new(endpoint, Some(Duration::from_secs(5)))
        .expect("client should build");
    let store = FileSnapshotStore::new(snapshot).expect("snapshot path names a file");
    let config = FanOutConfig {
        batch_size: NonZeroUsize::new(BATCH).expect("non-zero batch"),
        ..FanOutConfig::default()
    };
    let service = UserStatsService::new(
        Arc::new(store),
        FanOutAggregator::new(Arc::new(source), config),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

async fn get_users(state: web::Data<HttpState>) -> (u16, Option<String>, Option<String>, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .wrap(Trace)
            .service(web::resource("/users").to(list_users)),
    )
    .await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users").to_request(),
    )
    .await;
    let status = response.status().as_u16();
    let header = |name: &HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let source = header(&USERS_SOURCE_HEADER);
    let failed = header(&FAILED_FETCHES_HEADER);
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, source, failed, value)
}

fn snapshot_len(path: &Path) -> usize {
    let raw = std::fs::read(path).expect("snapshot should exist");
    let records: Vec<Value> = serde_json::from_slice(&raw).expect("snapshot is a JSON array");
    records.len()
}

fn assert_consistent_counts(body: &Value) {
    let total = body["total_users"].as_u64().expect("total_users");
    let male = body["male_count"].as_u64().expect("male_count");
    let female = body["female_count"].as_u64().expect("female_count");
    assert_eq!(
        total,
        body["users"].as_array().expect("users array").len() as u64
    );
    assert!(male + female <= total);

    let timing = body["execution_time"].as_str().expect("execution_time");
    let number = timing
        .strip_suffix(" seconds")
        .expect("execution_time ends in ' seconds'");
    let (whole, fraction) = number.split_once('.').expect("two decimal places");
    assert!(whole.chars().all(|c| c.is_ascii_digit()) && !whole.is_empty());
    assert_eq!(fraction.len(), 2);
    assert!(fraction.chars().all(|c| c.is_ascii_digit()));
}

#[actix_web::test]
async fn cold_start_fetches_every_batch_and_writes_the_snapshot() {
    let harness = harness().await;
    users_mock(batch_body("a", BATCH))
        .expect(3)
        .mount(&harness.upstream)
        .await;

    let (status, source, failed, body) =
        get_users(http_state(&harness.upstream, &harness.snapshot)).await;

    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("upstream"));
    assert_eq!(failed.as_deref(), Some("0"));
    assert_eq!(body["total_users"], json!(3 * BATCH));
    assert_eq!(body["male_count"], json!(3 * BATCH / 2));
    assert_eq!(body["female_count"], json!(3 * BATCH / 2));
    assert_consistent_counts(&body);
    assert_eq!(snapshot_len(&harness.snapshot), 3 * BATCH);
}

#[actix_web::test]
async fn warm_snapshot_is_served_without_upstream_calls() {
    let harness = harness().await;
    users_mock(batch_body("a", BATCH))
        .expect(3)
        .mount(&harness.upstream)
        .await;
    let state = http_state(&harness.upstream, &harness.snapshot);

    let (_, _, _, first) = get_users(state.clone()).await;
    let (status, source, _, second) = get_users(state).await;

    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("cache"));
    assert_eq!(first["users"], second["users"]);
    assert_eq!(first["total_users"], second["total_users"]);
    assert_consistent_counts(&second);
}

#[actix_web::test]
async fn existing_snapshot_short_circuits_the_fetch() {
    let harness = harness().await;
    let stored = json!([
        {
            "gender": "female",
            "first_name": "Aoife",
            "last_name": "Byrne",
            "email": "aoife.byrne@example.com",
            "city": "Sligo",
            "country": "Ireland",
            "uuid": "stored-1"
        }
    ]);
    std::fs::write(&harness.snapshot, stored.to_string()).expect("seed snapshot");
    users_mock(batch_body("a", BATCH))
        .expect(0)
        .mount(&harness.upstream)
        .await;

    let (status, source, _, body) =
        get_users(http_state(&harness.upstream, &harness.snapshot)).await;

    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("cache"));
    assert_eq!(body["users"], stored);
    assert_eq!(body["female_count"], json!(1));
    assert_eq!(body["male_count"], json!(0));
}

#[actix_web::test]
async fn corrupt_snapshot_is_replaced_by_a_fresh_fetch() {
    let harness = harness().await;
    std::fs::write(&harness.snapshot, b"{ not json").expect("seed corrupt snapshot");
    users_mock(batch_body("b", BATCH))
        .expect(3)
        .mount(&harness.upstream)
        .await;

    let (status, source, _, body) =
        get_users(http_state(&harness.upstream, &harness.snapshot)).await;

    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("upstream"));
    assert_eq!(body["total_users"], json!(3 * BATCH));
    assert_eq!(snapshot_len(&harness.snapshot), 3 * BATCH);
}

#[actix_web::test]
async fn one_failed_sub_fetch_still_answers_but_skips_the_snapshot() {
    let harness = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&harness.upstream)
        .await;
    users_mock(batch_body("c", BATCH))
        .expect(2)
        .mount(&harness.upstream)
        .await;

    let (status, source, failed, body) =
        get_users(http_state(&harness.upstream, &harness.snapshot)).await;

    assert_eq!(status, 200);
    assert_eq!(source.as_deref(), Some("upstream"));
    assert_eq!(failed.as_deref(), Some("1"));
    assert_eq!(body["total_users"], json!(2 * BATCH));
    assert_consistent_counts(&body);
    assert!(!harness.snapshot.exists(), "partial results must not be cached");
}

#[actix_web::test]
async fn total_outage_returns_an_empty_payload() {
    let harness = harness().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&harness.upstream)
        .await;

    let (status, _, failed, body) =
        get_users(http_state(&harness.upstream, &harness.snapshot)).await;

    assert_eq!(status, 200);
    assert_eq!(failed.as_deref(), Some("3"));
    assert_eq!(body["users"], json!([]));
    assert_eq!(body["male_count"], json!(0));
    assert_eq!(body["female_count"], json!(0));
    assert_eq!(body["total_users"], json!(0));
    assert_consistent_counts(&body);
    assert!(!harness.snapshot.exists());
}

#[actix_web::test]
async fn concurrent_cold_requests_fetch_only_once() {
    let harness = harness().await;
    users_mock(batch_body("d", BATCH))
        .expect(3)
        .mount(&harness.upstream)
        .await;
    let app = actix_test::init_service(
        App::new()
            .app_data(http_state(&harness.upstream, &harness.snapshot))
            .service(web::resource("/users").to(list_users)),
    )
    .await;

    let (first, second) = futures_util::join!(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/users").to_request(),
        ),
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/users").to_request(),
        ),
    );

    let mut sources: Vec<String> = [&first, &second]
        .iter()
        .filter_map(|response| response.headers().get(&USERS_SOURCE_HEADER))
        .filter_map(|value| value.to_str().ok().map(str::to_owned))
        .collect();
    sources.sort_unstable();
    assert_eq!(sources, ["cache", "upstream"]);
    for response in [first, second] {
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["total_users"], json!(3 * BATCH));
    }
    assert_eq!(snapshot_len(&harness.snapshot), 3 * BATCH);
    harness.upstream.verify().await;
}
