//! Pipeline configuration parsing from environment variables.

use super::{Lookup, parse_or};
use crate::application::pipeline::DEFAULT_PARALLEL_THRESHOLD;
use crate::application::result_builder::DEFAULT_DISPLAY_CAP;
use crate::domain::sentiment::{ClassificationStrategy, ScorePolicy};
use anyhow::{Result, ensure};

pub const DEFAULT_POST_LIMIT: usize = 30;

/// Sentiment pipeline environment configuration
#[derive(Debug, Clone)]
pub struct SentimentEnvConfig {
    pub strategy: ClassificationStrategy,
    pub post_limit: usize,
    pub display_cap: usize,
    pub score_policy: ScorePolicy,
    pub parallel_threshold: usize,
}

impl Default for SentimentEnvConfig {
    fn default() -> Self {
        Self {
            strategy: ClassificationStrategy::PlatformTag,
            post_limit: DEFAULT_POST_LIMIT,
            display_cap: DEFAULT_DISPLAY_CAP,
            score_policy: ScorePolicy::Always,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SentimentEnvConfig {
    pub fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        let strategy = parse_or(lookup, "SENTIMENT_STRATEGY", ClassificationStrategy::PlatformTag)?;
        let post_limit = parse_or(lookup, "SENTIMENT_POST_LIMIT", DEFAULT_POST_LIMIT)?;
        ensure!(post_limit > 0, "SENTIMENT_POST_LIMIT must be at least 1");

        Ok(Self {
            strategy,
            post_limit,
            display_cap: parse_or(lookup, "SENTIMENT_DISPLAY_CAP", DEFAULT_DISPLAY_CAP)?,
            score_policy: parse_or(lookup, "SENTIMENT_SCORE_POLICY", ScorePolicy::Always)?,
            parallel_threshold: parse_or(
                lookup,
                "SENTIMENT_PARALLEL_THRESHOLD",
                DEFAULT_PARALLEL_THRESHOLD,
            )?,
        })
    }
}
