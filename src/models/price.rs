use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single normalized candle with provenance.
///
/// `datetime` stays the source string: Twelve Data datetimes are ISO-formatted,
/// so lexicographic order is chronological order, and the value doubles as the
/// chart axis label without conversion. Series order follows the source, which
/// returns newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub datetime: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    pub symbol: String,
    pub retrieved_at: DateTime<Utc>,
}

/// A tradeable symbol as returned by the symbol listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
}

/// Supported time-series intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    /// Wire value understood by the Twelve Data API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1day",
            Interval::Weekly => "1week",
            Interval::Monthly => "1month",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1day" => Ok(Interval::Daily),
            "1week" => Ok(Interval::Weekly),
            "1month" => Ok(Interval::Monthly),
            other => Err(format!("unsupported interval: {}", other)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
