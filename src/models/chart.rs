//! Plotly-compatible figure types.
//!
//! These serialize into the `{data, layout}` shape that `Plotly.newPlot`
//! accepts directly, so the dashboard page renders the response as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<CandlestickTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlestickTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub increasing: DirectionStyle,
    pub decreasing: DirectionStyle,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionStyle {
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// A horizontal marker line connecting a level to the most recent data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub x0: String,
    pub y0: f64,
    pub x1: String,
    pub y1: f64,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
}
