mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, Request},
};
use common::{
    build_test_router, build_test_router_with, get, json_body, test_config, FakeProvider,
    FRONTEND_ORIGIN,
};
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn valid_ticker_returns_info_and_history() {
    let app = build_test_router(Arc::new(FakeProvider::aapl()));

    let response = get(app, "/api/stockdata/AAPL").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let body = json_body(response).await;
    assert_eq!(body["info"]["symbol"], "AAPL");
    assert_eq!(body["info"]["trailingPE"], Value::Null);
    assert_eq!(
        body["info"]["companyOfficers"],
        serde_json::json!(["Tim Cook", null])
    );

    let history = body["history"].as_array().unwrap();
    assert!(!history.is_empty());
    for row in history {
        assert!(row["Date"].is_string());
        for column in [
            "Open",
            "High",
            "Low",
            "Close",
            "Volume",
            "Dividends",
            "Stock Splits",
        ] {
            assert!(row[column].is_number(), "{} should be numeric", column);
        }
    }
    assert_eq!(history[0]["Date"], "2024-02-29T14:30:00Z");
}

#[tokio::test]
async fn ticker_is_normalized_before_fetching() {
    let provider = Arc::new(FakeProvider::aapl());
    let app = build_test_router(provider.clone());

    let response = get(app, "/api/stockdata/%20aapl%20").await;
    assert_eq!(response.status(), 200);

    let symbols = provider.symbols.lock().unwrap().clone();
    assert!(!symbols.is_empty());
    assert!(symbols.iter().all(|s| s == "AAPL"));
}

#[tokio::test]
async fn blank_ticker_is_bad_request() {
    let provider = Arc::new(FakeProvider::aapl());
    let app = build_test_router(provider.clone());

    let response = get(app, "/api/stockdata/%20%20").await;
    assert_eq!(response.status(), 400);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Ticker symbol is required");
    assert_eq!(body["code"], 400);

    assert!(provider.symbols.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_ticker_segment_is_bad_request() {
    let app = build_test_router(Arc::new(FakeProvider::aapl()));

    let response = get(app, "/api/stockdata/").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn empty_info_and_history_is_not_found() {
    let app = build_test_router(Arc::new(FakeProvider::empty()));

    let response = get(app, "/api/stockdata/zzzz").await;
    assert_eq!(response.status(), 404);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        "No data found or error processing for ticker symbol: ZZZZ"
    );
}

#[tokio::test]
async fn upstream_failure_is_not_found() {
    let app = build_test_router(Arc::new(FakeProvider::failing()));

    let response = get(app, "/api/stockdata/AAPL").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn slow_upstream_is_not_found_before_request_timeout() {
    let config = test_config(&[("STOCKDATA_REQUEST_TIMEOUT_MS", "1000")]);
    let app = build_test_router_with(
        Arc::new(FakeProvider::slow(Duration::from_secs(10))),
        &config,
    );

    let started = Instant::now();
    let response = get(app, "/api/stockdata/AAPL").await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(response.status(), 404);
    let body = json_body(response).await;
    assert_eq!(body["code"], 404);
    assert_eq!(
        body["error"],
        "No data found or error processing for ticker symbol: AAPL"
    );
}

#[tokio::test]
async fn cors_allows_frontend_origin_only() {
    let app = build_test_router(Arc::new(FakeProvider::aapl()));

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/stockdata/AAPL")
                .header(header::ORIGIN, FRONTEND_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND_ORIGIN
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/api/stockdata/AAPL")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!denied
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
