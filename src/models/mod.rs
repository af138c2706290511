//! Shared data models spanning the pipeline layers.

pub mod chart;
pub mod levels;
pub mod price;

pub use chart::Figure;
pub use levels::{ExtremaLevel, LevelKind};
pub use price::{Interval, PricePoint, SymbolInfo};
