//! Configuration module for tickerpulse.
//!
//! Configuration is read from environment variables (a `.env` file is honored
//! by the binaries) and grouped by concern: ingestion and the sentiment pipeline.

mod sentiment_config;
mod stocktwits_config;

pub use sentiment_config::{DEFAULT_POST_LIMIT, SentimentEnvConfig};
pub use stocktwits_config::{DEFAULT_STOCKTWITS_BASE_URL, StocktwitsConfig};

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Variable lookup, `std::env::var` in production and a map in tests.
pub(crate) type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Parse `key` if set, otherwise fall back to `default`.
pub(crate) fn parse_or<T>(lookup: &Lookup<'_>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Failed to parse {}={:?}", key, raw)),
        None => Ok(default),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub stocktwits: StocktwitsConfig,
    pub sentiment: SentimentEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        Ok(Self {
            stocktwits: StocktwitsConfig::from_lookup(lookup)
                .context("Failed to load Stocktwits config")?,
            sentiment: SentimentEnvConfig::from_lookup(lookup)
                .context("Failed to load sentiment config")?,
        })
    }
}
