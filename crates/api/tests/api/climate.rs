use crate::helpers::{measurement, spawn_app, station, MockClimateStore};
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use climate_api::{db, Measurement};
use hyper::{header, Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const INVALID_DATE_BODY: &str = r#"{"error":"Invalid date format. Use YYYY-MM-DD."}"#;

fn sample_measurements() -> Arc<[Measurement]> {
    // Latest date 2017-08-23; the trailing window starts 2016-08-23.
    // USC00519281 is the most active station.
    vec![
        measurement("USC00519397", "2016-08-22", Some(0.31), 69.0),
        measurement("USC00519397", "2016-08-23", Some(0.1), 77.0),
        measurement("USC00519281", "2016-08-23", Some(0.7), 72.0),
        measurement("USC00519281", "2017-08-21", None, 79.0),
        measurement("USC00519281", "2017-08-23", Some(0.45), 81.0),
    ]
    .into()
}

async fn get(test_app: &crate::helpers::TestApp, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn index_lists_available_routes() {
    let store = MockClimateStore::new();
    let test_app = spawn_app(Arc::new(store));

    let (status, body) = get(&test_app, "/").await;
    let html = String::from_utf8(body).unwrap();

    assert!(status.is_success());
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains("/api/v1.0/start/"));
    assert!(html.contains("/api/v1.0/start_end/"));
}

#[tokio::test]
async fn precipitation_returns_trailing_year_mapping() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Ok(sample_measurements()));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/precipitation").await;

    assert!(status.is_success());
    let series: Value = serde_json::from_slice(&body).unwrap();

    // 2016-08-22 is one day outside the trailing year
    assert_eq!(
        series,
        json!({
            "2016-08-23": 0.7,
            "2017-08-21": null,
            "2017-08-23": 0.45,
        })
    );
}

#[tokio::test]
async fn precipitation_boundary_date_collision_keeps_last_record() {
    let mut store = MockClimateStore::new();
    store.expect_measurements().times(1).returning(|| {
        Ok(vec![
            measurement("USC00519397", "2017-08-23", Some(0.1), 77.0),
            measurement("USC00519281", "2017-08-23", None, 72.0),
        ]
        .into())
    });

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/precipitation").await;

    assert!(status.is_success());
    let series: Value = serde_json::from_slice(&body).unwrap();
    // The later record reported no precipitation, so the date maps to null
    assert_eq!(series, json!({ "2017-08-23": null }));
}

#[tokio::test]
async fn stations_returns_directory_entries() {
    let mut store = MockClimateStore::new();
    store.expect_stations().times(1).returning(|| {
        Ok(vec![
            station("USC00519397", "WAIKIKI 717.2, HI US"),
            station("USC00519281", "WAIHEE 837.5, HI US"),
        ]
        .into())
    });

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/stations").await;

    assert!(status.is_success());
    let stations: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        stations,
        json!([
            { "station": "USC00519397", "name": "WAIKIKI 717.2, HI US" },
            { "station": "USC00519281", "name": "WAIHEE 837.5, HI US" },
        ])
    );
}

#[tokio::test]
async fn tobs_returns_most_active_station_ascending_by_date() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Ok(sample_measurements()));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/tobs").await;

    assert!(status.is_success());
    let observations: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        observations,
        json!([
            { "date": "2016-08-23", "temperature": 72.0 },
            { "date": "2017-08-21", "temperature": 79.0 },
            { "date": "2017-08-23", "temperature": 81.0 },
        ])
    );
}

#[tokio::test]
async fn stats_from_returns_one_summary_object() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Ok(sample_measurements()));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/start/2017-01-01").await;

    assert!(status.is_success());
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        stats,
        json!([{ "Min_Temp": 79.0, "Avg_Temp": 80.0, "Max_Temp": 81.0 }])
    );
}

#[tokio::test]
async fn range_with_no_matching_rows_is_an_empty_array() {
    let mut store = MockClimateStore::new();
    store.expect_measurements().times(1).returning(|| {
        Ok(vec![
            measurement("USC00519397", "2017-08-20", Some(0.0), 70.0),
            measurement("USC00519397", "2017-08-23", Some(0.0), 75.0),
        ]
        .into())
    });

    let test_app = spawn_app(Arc::new(store));
    // A well-formed range that happens to contain no readings
    let (status, body) = get(&test_app, "/api/v1.0/start_end/2017-08-21/2017-08-22").await;

    assert!(status.is_success());
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn malformed_start_date_is_a_client_error() {
    for bad in ["2017-13-01", "2017/01/01", "20170101", "17-01-01", "abc"] {
        let store = MockClimateStore::new();
        let test_app = spawn_app(Arc::new(store));

        let (status, body) = get(&test_app, &format!("/api/v1.0/start/{}", bad)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "input: {}", bad);
        assert_eq!(String::from_utf8(body).unwrap(), INVALID_DATE_BODY);
    }
}

#[tokio::test]
async fn malformed_end_date_is_a_client_error() {
    let store = MockClimateStore::new();
    let test_app = spawn_app(Arc::new(store));

    let (status, body) = get(&test_app, "/api/v1.0/start_end/2017-01-01/2017-13-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), INVALID_DATE_BODY);
}

#[tokio::test]
async fn inverted_range_is_an_empty_array_not_an_error() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Ok(sample_measurements()));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/start_end/2017-01-01/2016-01-01").await;

    assert!(status.is_success());
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn empty_snapshot_is_a_server_error() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Ok(vec![].into()));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(1)
        .returning(|| Err(db::Error::Snapshot("backing store unreadable".to_string())));

    let test_app = spawn_app(Arc::new(store));
    let (status, body) = get(&test_app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn identical_requests_give_identical_responses() {
    let mut store = MockClimateStore::new();
    store
        .expect_measurements()
        .times(2)
        .returning(|| Ok(sample_measurements()));

    let test_app = spawn_app(Arc::new(store));
    let (first_status, first_body) = get(&test_app, "/api/v1.0/precipitation").await;
    let (second_status, second_body) = get(&test_app, "/api/v1.0/precipitation").await;

    assert_eq!(first_status, second_status);
    assert_eq!(first_body, second_body);
}
