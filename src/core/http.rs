//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::config::Config;
use crate::error::Error;
use crate::metrics::Metrics;
use crate::models::Interval;
use crate::services::analysis::AnalysisService;
use crate::services::twelvedata::TwelveDataClient;

const MIN_OUTPUT_SIZE: u32 = 5;
const MAX_OUTPUT_SIZE: u32 = 200;
const DEFAULT_OUTPUT_SIZE: u32 = 40;

const DASHBOARD_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub analysis: Arc<AnalysisService>,
    pub default_countries: Arc<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "levelscope-api"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// List tradeable symbols. Repeated `country` query parameters narrow the
/// listing; without any, the configured defaults apply.
async fn list_symbols(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let countries: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "country")
        .map(|(_, value)| value)
        .collect();

    let countries = if countries.is_empty() {
        state.default_countries.as_ref().clone()
    } else {
        countries
    };

    let symbols = state
        .analysis
        .list_symbols(&countries)
        .await
        .map_err(error_response)?;

    Ok(Json(json!(symbols)))
}

#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    interval: Option<String>,
    outputsize: Option<u32>,
    global_only: Option<bool>,
}

/// Run the full pipeline for one symbol and return the figure plus the
/// detected levels.
async fn analyze_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<AnalysisQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let interval = match params.interval.as_deref() {
        None => Interval::Daily,
        Some(raw) => Interval::from_str(raw).map_err(bad_request)?,
    };

    let output_size = params.outputsize.unwrap_or(DEFAULT_OUTPUT_SIZE);
    if !(MIN_OUTPUT_SIZE..=MAX_OUTPUT_SIZE).contains(&output_size) {
        return Err(bad_request(format!(
            "outputsize must be between {} and {}",
            MIN_OUTPUT_SIZE, MAX_OUTPUT_SIZE
        )));
    }

    let global_only = params.global_only.unwrap_or(false);

    let analysis = state
        .analysis
        .analyze(&symbol, interval, output_size, global_only)
        .await
        .map_err(|e| {
            error!(error = %e, symbol = %symbol, "analysis failed");
            error_response(e)
        })?;

    Ok(Json(json!({
        "figure": analysis.figure,
        "levels": analysis.levels,
    })))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
}

fn error_response(error: Error) -> (StatusCode, Json<Value>) {
    let status = match error {
        Error::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::EmptyOrInvalidData(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/symbols", get(list_symbols))
        .route("/api/analysis/{symbol}", get(analyze_symbol))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    let client = TwelveDataClient::with_base_url(config.api_key, config.base_url)
        .with_metrics(metrics.clone());
    let analysis = Arc::new(AnalysisService::new(Arc::new(client)));

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time,
        analysis,
        default_countries: Arc::new(config.symbol_countries),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
