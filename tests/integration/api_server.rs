//! Integration tests for the HTTP API backed by a mocked Twelve Data server.

mod test_utils;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use test_utils::{mock_rate_limited, mock_stocks_list, mock_time_series, TestApp};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "levelscope-api");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApp::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected Prometheus metrics output"
    );
}

#[tokio::test]
async fn dashboard_page_is_served_at_root() {
    let app = TestApp::new().await;
    let response = app.server.get("/").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("support"));
}

#[tokio::test]
async fn symbols_endpoint_concatenates_default_country_listings() {
    let app = TestApp::new().await;
    mock_stocks_list(&app.twelve_data, "USA", &[("AAPL", "Apple Inc")]).await;
    mock_stocks_list(
        &app.twelve_data,
        "United Kingdom",
        &[("VOD", "Vodafone Group")],
    )
    .await;

    let response = app.server.get("/api/symbols").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let symbols: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, vec!["AAPL", "VOD"]);
    assert_eq!(body[0]["name"], "Apple Inc");
    assert_eq!(body[0]["currency"], "USD");
    assert_eq!(body[0]["exchange"], "NASDAQ");
}

#[tokio::test]
async fn symbols_endpoint_honors_country_filter() {
    let app = TestApp::new().await;
    mock_stocks_list(&app.twelve_data, "Germany", &[("SAP", "SAP SE")]).await;

    let response = app.server.get("/api/symbols?country=Germany").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body[0]["symbol"], "SAP");
}

#[tokio::test]
async fn analysis_returns_figure_and_levels() {
    let app = TestApp::new().await;
    mock_time_series(&app.twelve_data, "AAPL").await;

    let response = app
        .server
        .get("/api/analysis/AAPL?interval=1day&outputsize=7")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let levels = body["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 2);
    assert!(levels
        .iter()
        .any(|l| l["kind"] == "support" && l["price"] == 2.0));
    assert!(levels
        .iter()
        .any(|l| l["kind"] == "resistance" && l["price"] == 14.0));

    let figure = &body["figure"];
    assert_eq!(figure["data"][0]["type"], "candlestick");
    assert_eq!(figure["data"][0]["x"].as_array().unwrap().len(), 7);
    assert_eq!(figure["layout"]["shapes"].as_array().unwrap().len(), 2);
    // Level lines end at the most recent point, which comes first.
    assert_eq!(figure["layout"]["shapes"][0]["x1"], "2024-01-07");
}

#[tokio::test]
async fn analysis_global_only_returns_at_most_one_level_per_kind() {
    let app = TestApp::new().await;
    mock_time_series(&app.twelve_data, "AAPL").await;

    let response = app
        .server
        .get("/api/analysis/AAPL?outputsize=7&global_only=true")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let levels = body["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0]["kind"], "support");
    assert_eq!(levels[1]["kind"], "resistance");
}

#[tokio::test]
async fn analysis_rejects_invalid_interval() {
    let app = TestApp::new().await;
    let response = app.server.get("/api/analysis/AAPL?interval=1h").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn analysis_rejects_out_of_range_outputsize() {
    let app = TestApp::new().await;
    for size in ["4", "201", "0"] {
        let response = app
            .server
            .get(&format!("/api/analysis/AAPL?outputsize={}", size))
            .await;
        assert_eq!(response.status_code(), 400, "outputsize {}", size);
    }
}

#[tokio::test]
async fn rate_limit_surfaces_as_service_unavailable() {
    let app = TestApp::new().await;
    mock_rate_limited(&app.twelve_data).await;

    let response = app.server.get("/api/analysis/AAPL").await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("temporarily unavailable"));
}

#[tokio::test]
async fn upstream_http_error_surfaces_as_service_unavailable() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.twelve_data)
        .await;

    let response = app.server.get("/api/analysis/AAPL").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn empty_upstream_batch_surfaces_as_bad_gateway() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [],
            "status": "ok"
        })))
        .mount(&app.twelve_data)
        .await;

    let response = app.server.get("/api/analysis/AAPL").await;
    assert_eq!(response.status_code(), 502);
}

#[tokio::test]
async fn record_with_empty_field_surfaces_as_bad_gateway() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{
                "datetime": "2024-01-02",
                "open": "10",
                "high": "11",
                "low": "",
                "close": "10.5",
                "volume": "120000"
            }],
            "status": "ok"
        })))
        .mount(&app.twelve_data)
        .await;

    let response = app.server.get("/api/analysis/AAPL").await;
    assert_eq!(response.status_code(), 502);
}

#[tokio::test]
async fn upstream_requests_are_counted() {
    let app = TestApp::new().await;
    mock_time_series(&app.twelve_data, "AAPL").await;

    app.server.get("/api/analysis/AAPL?outputsize=7").await;

    assert!(app.metrics.upstream_requests_total.get() >= 1);
    let exported = app.metrics.export().expect("metrics export");
    assert!(exported.contains("upstream_requests_total"));
}
