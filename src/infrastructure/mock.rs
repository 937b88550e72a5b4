use crate::domain::errors::SentimentError;
use crate::domain::ports::PostSource;
use crate::domain::sentiment::{PlatformTag, RawPost};
use crate::domain::ticker::Ticker;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// In-memory post source backed by fixed fixtures.
///
/// Unknown tickers fail with `NotFound`; a ticker registered with no posts
/// returns an empty list.
#[derive(Debug, Default)]
pub struct StaticPostSource {
    posts: HashMap<String, Vec<RawPost>>,
    calls: AtomicUsize,
}

impl StaticPostSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(mut self, ticker: &str, posts: Vec<RawPost>) -> Self {
        self.posts.insert(ticker.to_ascii_uppercase(), posts);
        self
    }

    /// Number of `fetch_posts` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Canned streams for offline runs.
    pub fn demo() -> Self {
        let post = |id: &str, text: &str, author: &str, tag: Option<PlatformTag>| {
            RawPost::new(Some(id.to_string()), text, author, tag)
        };

        Self::new()
            .with_posts(
                "AAPL",
                vec![
                    post("9001", "$AAPL beats on services, buying more", "orchard", Some(PlatformTag::Bullish)),
                    post("9002", "iPhone cycle looks strong, long into the event", "keynote_kid", Some(PlatformTag::Bullish)),
                    post("9003", "holding through earnings", "patient_pm", None),
                    post("9004", "overvalued here, trimming", "value_vince", Some(PlatformTag::Bearish)),
                    post("9005", "breakout above resistance, calls printing", "chartist", Some(PlatformTag::Bullish)),
                ],
            )
            .with_posts(
                "TSLA",
                vec![
                    post("9101", "deliveries miss again, puts", "bear_cub", Some(PlatformTag::Bearish)),
                    post("9102", "margins crash, selling", "skeptic", Some(PlatformTag::Bearish)),
                    post("9103", "robotaxi day will moon", "diamond_hands", Some(PlatformTag::Bullish)),
                    post("9104", "downgrade from two brokers", "newsbot", None),
                    post("9105", "tanking into close", "tape_reader", Some(PlatformTag::Bearish)),
                ],
            )
            .with_posts(
                "WFC",
                vec![
                    post("9201", "dividend announced", "income_ian", None),
                    post("9202", "flat day for banks", "macro_mo", None),
                    post("9203", "asset cap talk again", "fed_watcher", None),
                ],
            )
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_posts(
        &self,
        ticker: &Ticker,
        limit: usize,
    ) -> Result<Vec<RawPost>, SentimentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let posts = self
            .posts
            .get(ticker.as_str())
            .ok_or_else(|| SentimentError::NotFound {
                ticker: ticker.to_string(),
            })?;

        info!("Serving {} fixture posts for ${}", posts.len().min(limit), ticker);
        Ok(posts.iter().take(limit).cloned().collect())
    }
}
