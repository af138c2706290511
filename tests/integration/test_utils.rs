use std::sync::Arc;
use std::time::Instant;

use axum_test::TestServer;
use levelscope::core::http::{create_router, AppState, HealthStatus};
use levelscope::metrics::Metrics;
use levelscope::services::analysis::AnalysisService;
use levelscope::services::twelvedata::TwelveDataClient;
use serde_json::json;
use tokio::sync::RwLock;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper structure bundling together the HTTP server and the mocked
/// Twelve Data API.
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub twelve_data: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;

        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let client = TwelveDataClient::with_base_url("test-key".to_string(), mock_server.uri())
            .with_metrics(metrics.clone());
        let analysis = Arc::new(AnalysisService::new(Arc::new(client)));

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            analysis,
            default_countries: Arc::new(vec![
                "USA".to_string(),
                "United Kingdom".to_string(),
            ]),
        };

        let router = create_router(state);
        let server = TestServer::new(router).expect("start test server");

        Self {
            server,
            metrics,
            twelve_data: mock_server,
        }
    }
}

/// Mount a `/stocks` listing for one country.
pub async fn mock_stocks_list(server: &MockServer, country: &str, symbols: &[(&str, &str)]) {
    let data: Vec<_> = symbols
        .iter()
        .map(|(symbol, name)| {
            json!({
                "symbol": symbol,
                "name": name,
                "currency": "USD",
                "exchange": "NASDAQ",
                "country": country,
                "type": "Common Stock"
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/stocks"))
        .and(query_param("country", country))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": data,
            "status": "ok"
        })))
        .mount(server)
        .await;
}

/// Mount a `/time_series` response whose lows form a V and highs form a peak,
/// so exactly one support and one resistance qualify.
pub async fn mock_time_series(server: &MockServer, symbol: &str) {
    let lows = [5.0, 4.0, 3.0, 2.0, 3.0, 4.0, 5.0];
    let highs = [11.0, 12.0, 13.0, 14.0, 13.0, 12.0, 11.0];

    // Newest-first, as Twelve Data returns it.
    let values: Vec<_> = lows
        .iter()
        .zip(highs.iter())
        .enumerate()
        .map(|(i, (&low, &high))| {
            json!({
                "datetime": format!("2024-01-{:02}", 7 - i),
                "open": format!("{}", low + 1.0),
                "high": format!("{}", high),
                "low": format!("{}", low),
                "close": format!("{}", high - 1.0),
                "volume": "120000"
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/time_series"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "symbol": symbol, "interval": "1day" },
            "values": values,
            "status": "ok"
        })))
        .mount(server)
        .await;
}

/// Mount a rate-limit error envelope (Twelve Data replies 200 with
/// `status: "error"`).
pub async fn mock_rate_limited(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/time_series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 429,
            "message": "You have run out of API credits for the current minute.",
            "status": "error"
        })))
        .mount(server)
        .await;
}
