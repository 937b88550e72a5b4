use crate::domain::errors::SentimentError;
use crate::domain::sentiment::RawPost;
use crate::domain::ticker::Ticker;
use async_trait::async_trait;

/// Ingestion port: delivers already-fetched posts for a ticker.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Short identifier used in logs and upstream errors.
    fn name(&self) -> &str;

    /// Fetch at most `limit` posts, newest first as the platform orders them.
    ///
    /// Fails with `NotFound` when the platform has no data for the ticker and
    /// with `Upstream` on transport or payload failures. No retries here.
    async fn fetch_posts(&self, ticker: &Ticker, limit: usize)
    -> Result<Vec<RawPost>, SentimentError>;
}
