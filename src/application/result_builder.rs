use crate::domain::sentiment::{
    AggregateResult, ClassificationStrategy, ScorePolicy, SentimentBreakdown, SentimentResponse,
};
use chrono::Utc;

pub const DEFAULT_DISPLAY_CAP: usize = 20;

/// Assembles the caller-facing response from an aggregate.
#[derive(Debug, Clone, Copy)]
pub struct ResultBuilder {
    display_cap: usize,
    score_policy: ScorePolicy,
}

impl Default for ResultBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_CAP, ScorePolicy::default())
    }
}

impl ResultBuilder {
    pub fn new(display_cap: usize, score_policy: ScorePolicy) -> Self {
        Self {
            display_cap,
            score_policy,
        }
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap
    }

    pub fn score_policy(&self) -> ScorePolicy {
        self.score_policy
    }

    /// Truncate the post list to the display cap, keeping input order.
    /// Counts and score still cover every post.
    pub fn build(
        &self,
        mut result: AggregateResult,
        strategy: ClassificationStrategy,
    ) -> SentimentResponse {
        result.posts.truncate(self.display_cap);

        if self.score_policy == ScorePolicy::OmitForTags
            && strategy == ClassificationStrategy::PlatformTag
        {
            result.overall_score = None;
        }

        SentimentResponse {
            breakdown: SentimentBreakdown::from_counts(&result.counts()),
            result,
            strategy,
            score_policy: self.score_policy,
            generated_at: Utc::now(),
        }
    }
}
