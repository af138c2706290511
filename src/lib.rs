pub mod chart;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod services;

pub use error::Error;
