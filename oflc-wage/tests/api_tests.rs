//! HTTP routing tests
//!
//! Drive the router in-process with `oneshot`; no socket is bound.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use helpers::*;
use http_body_util::BodyExt;
use oflc_wage::{build_router, AppState, DataSources, WageStore};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn app(t: &TestStore) -> Router {
    build_router(AppState::new(
        t.store.clone(),
        t.sources.clone(),
        TEST_TIMEOUT,
    ))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let t = scenario_store().await;
    let (status, body) = send(app(&t), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "oflc-wage");
}

#[tokio::test]
async fn test_forward_search_ok() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/forward",
            json!({"position": "Manager", "location": "California", "county": "Orange County"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["occupation"], "General Manager");
    assert_eq!(results[0]["soc_code"], "11-1021");
    assert_eq!(results[0]["location"], "Irvine, California");
    assert_eq!(results[0]["level2"], 62400.0);
}

#[tokio::test]
async fn test_forward_search_not_found() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/forward",
            json!({"position": "Nonexistent", "location": "California"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No matching occupations found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_forward_search_missing_fields() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json("/api/search/forward", json!({"location": "California"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Job title and location cannot be empty");
}

#[tokio::test]
async fn test_reverse_search_levels() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/reverse",
            json!({"min_salary": 60000, "max_salary": 70000, "location": "California"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["results"][0]["matching_levels"],
        json!([{"level": 2, "salary": 62400.0}])
    );
}

#[tokio::test]
async fn test_location_search_default_level() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/location",
            json!({"position": "Manager", "target_salary": 60000}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["target_level"], 2);
    assert_eq!(body["results"][0]["target_level_salary"], 62400.0);
    assert_eq!(body["results"][0]["location"], "California");
}

#[tokio::test]
async fn test_lookups() {
    let t = sample_store().await;

    let (status, body) = send(app(&t), get("/api/occupations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["occupations"].as_array().unwrap().len(), 6);

    let (_, body) = send(app(&t), get("/api/locations")).await;
    assert_eq!(body["locations"][0], json!({"state": "California", "area_name": "Anaheim"}));

    let (_, body) = send(app(&t), get("/api/search/occupations?q=Manager")).await;
    assert_eq!(body["occupations"][0]["title"], "Manager Trainee");

    let (_, body) = send(app(&t), get("/api/search/states?q=TX")).await;
    assert_eq!(body["states"], json!([{"state": "Texas", "state_ab": "TX"}]));

    let (_, body) = send(
        app(&t),
        get("/api/search/counties?q=Orange&state=Texas"),
    )
    .await;
    assert_eq!(body["counties"], json!([{"county": "Orange County"}]));
}

#[tokio::test]
async fn test_autocomplete_without_query_is_empty() {
    let t = sample_store().await;

    for uri in [
        "/api/search/occupations",
        "/api/search/states?q=",
        "/api/search/counties?q=%20",
    ] {
        let (status, body) = send(app(&t), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        let list = body.as_object().unwrap().values().next().unwrap();
        assert_eq!(list, &json!([]), "{}", uri);
    }
}

#[tokio::test]
async fn test_search_before_init_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = WageStore::uninitialized(store_path(dir.path()));
    let app = build_router(AppState::new(
        store,
        DataSources::from_dir(dir.path()),
        TEST_TIMEOUT,
    ));

    let (status, body) = send(
        app.clone(),
        post_json(
            "/api/search/forward",
            json!({"position": "Manager", "location": "California"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");

    // Health stays up
    let (status, _) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_init_db_then_search() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path(), SAMPLE_WAGES, SAMPLE_GEOGRAPHY, SAMPLE_OCCUPATIONS);
    let store = WageStore::uninitialized(store_path(dir.path()));
    let app = build_router(AppState::new(store, sources, TEST_TIMEOUT));

    let (status, body) = send(app.clone(), post_json("/api/init-db", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data_counts"],
        json!({"wage_data": 10, "geography": 7, "occupations": 6})
    );

    let (status, body) = send(app.clone(), get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initialized"], true);
    assert!(body["last_rebuilt"].is_string());

    let (status, _) = send(
        app,
        post_json(
            "/api/search/forward",
            json!({"position": "Chef", "location": "Irvine"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_init_db_missing_sources() {
    let dir = tempfile::tempdir().unwrap();
    let store = WageStore::uninitialized(store_path(dir.path()));
    let app = build_router(AppState::new(
        store,
        DataSources::from_dir(dir.path()),
        TEST_TIMEOUT,
    ));

    let (status, body) = send(app, post_json("/api/init-db", json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Geography.csv"));
}

#[tokio::test]
async fn test_numeric_strings_accepted() {
    let t = scenario_store().await;

    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/reverse",
            json!({"min_salary": "60000", "max_salary": "70000", "location": "California"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["results"][0]["matching_levels"][0]["salary"], 62400.0);

    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/location",
            json!({"position": "Manager", "target_level": "2", "target_salary": "60000"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["results"][0]["target_level"], 2);
}

#[tokio::test]
async fn test_unreadable_body_uses_error_envelope() {
    let t = scenario_store().await;

    let cases = [
        ("/api/search/forward", "not json".to_string()),
        (
            "/api/search/reverse",
            json!({"min_salary": "sixty thousand", "max_salary": 70000, "location": "California"})
                .to_string(),
        ),
        (
            "/api/search/location",
            json!({"position": "Manager", "target_level": "two", "target_salary": 60000})
                .to_string(),
        ),
        (
            "/api/search/forward",
            json!({"position": 42, "location": "California"}).to_string(),
        ),
    ];

    for (uri, payload) in cases {
        let (status, body) = send(app(&t), post_raw(uri, &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, payload);
        assert_eq!(body["code"], "VALIDATION_ERROR", "{} {}", uri, payload);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_blank_amount_is_validation_error() {
    let t = scenario_store().await;
    let (status, body) = send(
        app(&t),
        post_json(
            "/api/search/reverse",
            json!({"min_salary": "", "max_salary": 70000, "location": "California"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Salary range and location cannot be empty");
}

#[tokio::test]
async fn test_lookup_timeout_is_gateway_timeout() {
    let t = scenario_store().await;
    let app = build_router(AppState::new(
        t.store.clone(),
        t.sources.clone(),
        Duration::ZERO,
    ));

    let (status, body) = send(
        app,
        post_json(
            "/api/search/forward",
            json!({"position": "Manager", "location": "California"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], "TIMEOUT");
}
