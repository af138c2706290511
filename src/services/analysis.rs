//! Pipeline glue: fetch → normalize → scan → chart.
//!
//! Strictly linear per request; failures from the fetch and normalize stages
//! propagate to the caller, while an insufficient series is a normal empty
//! result.

use crate::chart;
use crate::error::Error;
use crate::indicators::{
    find_resistance_levels, find_support_levels, global_resistance, global_support,
};
use crate::models::{ExtremaLevel, Figure, Interval, PricePoint, SymbolInfo};
use crate::normalize::normalize_batch;
use crate::services::market_data::MarketDataSource;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Result of one analysis run: the normalized series, the detected levels
/// tagged by kind, and the ready-to-render figure.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub series: Vec<PricePoint>,
    pub levels: Vec<ExtremaLevel>,
    pub figure: Figure,
}

pub struct AnalysisService {
    source: Arc<dyn MarketDataSource>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn list_symbols(&self, countries: &[String]) -> Result<Vec<SymbolInfo>, Error> {
        self.source.list_symbols(countries).await
    }

    pub async fn analyze(
        &self,
        symbol: &str,
        interval: Interval,
        output_size: u32,
        global_only: bool,
    ) -> Result<Analysis, Error> {
        let raw = self.source.fetch_series(symbol, interval, output_size).await?;
        let series = normalize_batch(&raw, symbol, Utc::now())?;

        let mut levels = Vec::new();
        if global_only {
            levels.extend(global_support(&series));
            levels.extend(global_resistance(&series));
        } else {
            levels.extend(find_support_levels(&series));
            levels.extend(find_resistance_levels(&series));
        }

        info!(
            symbol = symbol,
            interval = %interval,
            points = series.len(),
            levels = levels.len(),
            "analysis complete"
        );

        let figure = chart::build_figure(&series, &levels, symbol);
        Ok(Analysis {
            series,
            levels,
            figure,
        })
    }
}
