//! Candlestick figure construction with level overlay.
//!
//! Pure rendering: each level becomes one line shape from its own point to the
//! most recent point (index 0 under the source's newest-first ordering).

use crate::models::chart::{
    Axis, CandlestickTrace, DirectionStyle, Figure, Layout, LineStyle, RangeSlider, Shape,
};
use crate::models::{ExtremaLevel, LevelKind, PricePoint};

const SUPPORT_COLOR: &str = "blue";
const RESISTANCE_COLOR: &str = "orange";
const LEVEL_LINE_WIDTH: u32 = 2;

/// Build a Plotly-compatible candlestick figure with one marker line per
/// detected level.
pub fn build_figure(series: &[PricePoint], levels: &[ExtremaLevel], symbol: &str) -> Figure {
    let trace = CandlestickTrace {
        trace_type: "candlestick".to_string(),
        x: series.iter().map(|p| p.datetime.clone()).collect(),
        open: series.iter().map(|p| p.open).collect(),
        high: series.iter().map(|p| p.high).collect(),
        low: series.iter().map(|p| p.low).collect(),
        close: series.iter().map(|p| p.close).collect(),
        increasing: direction_style("green"),
        decreasing: direction_style("red"),
        opacity: 0.7,
    };

    let most_recent = series.first().map(|p| p.datetime.as_str()).unwrap_or("");
    let shapes = levels
        .iter()
        .map(|level| level_shape(level, most_recent))
        .collect();

    let title = match series.first() {
        Some(point) => format!(
            "Candlestick Chart for {} (Execution Time: {})",
            symbol,
            point.retrieved_at.to_rfc3339()
        ),
        None => format!("Candlestick Chart for {}", symbol),
    };

    Figure {
        data: vec![trace],
        layout: Layout {
            title,
            xaxis: Axis {
                title: "Date".to_string(),
                rangeslider: Some(RangeSlider { visible: true }),
            },
            yaxis: Axis {
                title: "Price".to_string(),
                rangeslider: None,
            },
            shapes,
        },
    }
}

fn level_shape(level: &ExtremaLevel, most_recent_datetime: &str) -> Shape {
    let color = match level.kind {
        LevelKind::Support => SUPPORT_COLOR,
        LevelKind::Resistance => RESISTANCE_COLOR,
    };
    Shape {
        shape_type: "line".to_string(),
        x0: level.datetime.clone(),
        y0: level.price,
        x1: most_recent_datetime.to_string(),
        y1: level.price,
        line: LineStyle {
            color: color.to_string(),
            width: Some(LEVEL_LINE_WIDTH),
        },
    }
}

fn direction_style(color: &str) -> DirectionStyle {
    DirectionStyle {
        line: LineStyle {
            color: color.to_string(),
            width: None,
        },
    }
}
