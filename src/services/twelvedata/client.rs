//! REST client for the Twelve Data API.
//!
//! All transport, rate-limit, and malformed-response failures collapse into
//! `Error::SourceUnavailable`; the pipeline does not retry.

use super::models::{ApiErrorEnvelope, StocksResponse, TimeSeriesResponse};
use crate::error::Error;
use crate::metrics::Metrics;
use crate::models::{Interval, SymbolInfo};
use crate::services::market_data::MarketDataSource;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TwelveDataClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    metrics: Option<Arc<Metrics>>,
}

impl TwelveDataClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.twelvedata.com";

    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url,
            metrics: None,
        }
    }

    /// Attach a metrics registry for upstream request counters.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        if let Some(metrics) = &self.metrics {
            metrics.upstream_requests_total.inc();
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Twelve Data request");

        let result = self.request(&url, query).await;
        if result.is_err() {
            if let Some(metrics) = &self.metrics {
                metrics.upstream_errors_total.inc();
            }
        }
        result
    }

    async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Twelve Data transport error");
                Error::SourceUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "Twelve Data HTTP error");
            return Err(Error::SourceUnavailable(format!(
                "upstream returned HTTP {}",
                status
            )));
        }

        // Twelve Data signals rate limits and bad symbols with a 200 and an
        // error envelope in the body.
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
            if envelope.is_error() {
                warn!(code = ?envelope.code, message = %envelope.message, "Twelve Data API error");
                return Err(Error::SourceUnavailable(envelope.message));
            }
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Twelve Data malformed response");
            Error::SourceUnavailable(format!("malformed upstream response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MarketDataSource for TwelveDataClient {
    async fn list_symbols(&self, countries: &[String]) -> Result<Vec<SymbolInfo>, Error> {
        let mut symbols = Vec::new();
        for country in countries {
            let response: StocksResponse = self
                .get("/stocks", &[("country", country.clone())])
                .await?;
            symbols.extend(response.data.into_iter().map(|entry| SymbolInfo {
                symbol: entry.symbol,
                name: entry.name,
                currency: entry.currency,
                exchange: entry.exchange,
            }));
        }
        Ok(symbols)
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        output_size: u32,
    ) -> Result<Vec<Map<String, Value>>, Error> {
        let response: TimeSeriesResponse = self
            .get(
                "/time_series",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.as_str().to_string()),
                    ("outputsize", output_size.to_string()),
                ],
            )
            .await?;
        Ok(response.values)
    }
}
