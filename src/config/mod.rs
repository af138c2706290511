//! Environment-driven configuration.
//!
//! The Twelve Data credential is read once here and handed to the adapter's
//! constructor; nothing else in the crate touches the environment for it.

use crate::error::Error;
use std::env;

/// Get the current environment name (defaults to "sandbox")
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Twelve Data API key, passed into the adapter constructor.
    pub api_key: String,
    /// Base URL of the Twelve Data REST API. Overridable for tests.
    pub base_url: String,
    /// HTTP listen port.
    pub port: u16,
    /// Country filters used for the symbol listing.
    pub symbol_countries: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let api_key = env::var("TWELVE_DATA_API_KEY")
            .map_err(|_| Error::Config("TWELVE_DATA_API_KEY is not set".to_string()))?;

        let base_url = env::var("TWELVE_DATA_BASE_URL")
            .unwrap_or_else(|_| "https://api.twelvedata.com".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT value: {}", raw)))?,
            Err(_) => 8080,
        };

        let symbol_countries = env::var("SYMBOL_COUNTRIES")
            .map(|raw| {
                raw.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec!["USA".to_string(), "United Kingdom".to_string()]
            });

        Ok(Self {
            api_key,
            base_url,
            port,
            symbol_countries,
        })
    }
}
