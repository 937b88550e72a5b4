//! Ingestion configuration parsing from environment variables.

use super::{Lookup, parse_or};
use anyhow::Result;
use std::time::Duration;

pub const DEFAULT_STOCKTWITS_BASE_URL: &str = "https://api.stocktwits.com/api/2";

/// Stocktwits transport configuration
#[derive(Debug, Clone)]
pub struct StocktwitsConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for StocktwitsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STOCKTWITS_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }
}

impl StocktwitsConfig {
    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        Ok(Self {
            base_url: lookup("STOCKTWITS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STOCKTWITS_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or(lookup, "HTTP_TIMEOUT_SECS", 10u64)?),
            max_retries: parse_or(lookup, "HTTP_MAX_RETRIES", 3u32)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stocktwits_config_defaults() {
        let config = StocktwitsConfig::from_lookup(&|_| None).unwrap();
        assert!(config.base_url.contains("stocktwits.com"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_stocktwits_config_rejects_bad_timeout() {
        let result = StocktwitsConfig::from_lookup(&|key| {
            (key == "HTTP_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
