//! Market data source interface; the pipeline depends on this seam only.

use crate::error::Error;
use crate::models::{Interval, SymbolInfo};
use serde_json::{Map, Value};

#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// List tradeable symbols, filtered by country.
    async fn list_symbols(&self, countries: &[String]) -> Result<Vec<SymbolInfo>, Error>;

    /// Fetch a raw time series for a symbol. Records keep their string-keyed
    /// shape for the normalizer.
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: Interval,
        output_size: u32,
    ) -> Result<Vec<Map<String, Value>>, Error>;
}
