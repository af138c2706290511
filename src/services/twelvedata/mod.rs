//! Twelve Data market data source implementation.

pub mod client;
pub mod models;

pub use client::TwelveDataClient;
