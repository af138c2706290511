//! Wire models for the Twelve Data REST API.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Response of `GET /stocks`.
#[derive(Debug, Deserialize)]
pub struct StocksResponse {
    #[serde(default)]
    pub data: Vec<StockEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StockEntry {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub exchange: String,
}

/// Response of `GET /time_series`.
///
/// Records are kept as raw maps; typing them is the normalizer's job.
#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub values: Vec<Map<String, Value>>,
}

/// Error envelope used by every Twelve Data endpoint
/// (`{"code": 429, "message": "...", "status": "error"}`).
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorEnvelope {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}
