//! Ticker → posts → labels → aggregate → response.
//!
//! One request runs strictly in sequence. Only classification may fan out (see
//! [`classify_all`]); aggregation is always a single sequential reduction.

use crate::application::aggregator::aggregate;
use crate::application::classifier::{PostClassifier, classify_all};
use crate::application::result_builder::ResultBuilder;
use crate::domain::errors::{ErrorBody, SentimentError};
use crate::domain::ports::PostSource;
use crate::domain::sentiment::{ClassificationStrategy, SentimentResponse};
use crate::domain::ticker::{Ticker, parse_ticker_list};
use crate::infrastructure::observability::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Caller-owned flag to abandon a request.
///
/// Clones share the same flag. The pipeline checks it once ingestion returns
/// and again before aggregation.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct SentimentPipeline {
    source: Arc<dyn PostSource>,
    classifier: Arc<dyn PostClassifier>,
    builder: ResultBuilder,
    parallel_threshold: usize,
    metrics: Option<Metrics>,
}

impl SentimentPipeline {
    pub fn new(source: Arc<dyn PostSource>, classifier: Arc<dyn PostClassifier>) -> Self {
        Self {
            source,
            classifier,
            builder: ResultBuilder::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            metrics: None,
        }
    }

    pub fn with_result_builder(mut self, builder: ResultBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn strategy(&self) -> ClassificationStrategy {
        self.classifier.strategy()
    }

    /// Aggregate sentiment for one ticker.
    ///
    /// The ticker is validated before the source is called. Source errors are
    /// returned unchanged.
    pub async fn run(
        &self,
        raw_ticker: &str,
        limit: usize,
        cancel: &CancelSignal,
    ) -> Result<SentimentResponse, SentimentError> {
        let outcome = self.execute(raw_ticker, limit, cancel).await;

        if let Some(metrics) = &self.metrics {
            let kind = match &outcome {
                Ok(_) => "ok",
                Err(e) => e.kind(),
            };
            metrics.inc_request(kind);
        }

        outcome
    }

    async fn execute(
        &self,
        raw_ticker: &str,
        limit: usize,
        cancel: &CancelSignal,
    ) -> Result<SentimentResponse, SentimentError> {
        let ticker = Ticker::parse(raw_ticker)?;
        if limit == 0 {
            return Err(SentimentError::validation(
                format!("limit={}", limit),
                "post limit must be at least 1",
            ));
        }

        info!(
            "Fetching up to {} posts for ${} from {}",
            limit,
            ticker,
            self.source.name()
        );
        let started = Instant::now();
        let mut posts = match self.source.fetch_posts(&ticker, limit).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Ingestion failed for ${}: {}", ticker, e);
                return Err(e);
            }
        };
        posts.truncate(limit);
        self.observe("fetch", started);

        if cancel.is_cancelled() {
            info!("Request for ${} cancelled after ingestion", ticker);
            return Err(SentimentError::Cancelled {
                stage: "classification".to_string(),
            });
        }

        let started = Instant::now();
        let classified = classify_all(self.classifier.as_ref(), posts, self.parallel_threshold);
        self.observe("classify", started);
        debug!("Classified {} posts for ${}", classified.len(), ticker);

        if cancel.is_cancelled() {
            info!("Request for ${} cancelled after classification", ticker);
            return Err(SentimentError::Cancelled {
                stage: "aggregation".to_string(),
            });
        }

        let result = aggregate(&ticker, classified)?;
        let strategy = self.classifier.strategy();

        if let Some(metrics) = &self.metrics {
            let counts = result.counts();
            let strategy = strategy.to_string();
            metrics.inc_classified(&strategy, "bullish", counts.bullish);
            metrics.inc_classified(&strategy, "neutral", counts.neutral);
            metrics.inc_classified(&strategy, "bearish", counts.bearish);
        }

        info!(
            "${}: {} posts -> {} (bullish {}, neutral {}, bearish {})",
            ticker,
            result.tweet_count,
            result.label,
            result.bullish_count,
            result.neutral_count,
            result.bearish_count
        );

        Ok(self.builder.build(result, strategy))
    }

    /// Run the pipeline for every ticker in a free-form list, one at a time.
    ///
    /// A failing ticker is recorded in its entry and does not stop the sweep.
    pub async fn run_portfolio(
        &self,
        raw_list: &str,
        limit: usize,
        cancel: &CancelSignal,
    ) -> PortfolioReport {
        let list = parse_ticker_list(raw_list);
        if !list.rejected.is_empty() {
            warn!("Skipping invalid tickers: {:?}", list.rejected);
        }

        let mut entries = Vec::with_capacity(list.tickers.len());
        for ticker in &list.tickers {
            let outcome = if cancel.is_cancelled() {
                Err(SentimentError::Cancelled {
                    stage: "ingestion".to_string(),
                })
            } else {
                self.run(ticker.as_str(), limit, cancel).await
            };
            entries.push(PortfolioEntry::from_outcome(ticker, outcome));
        }

        PortfolioReport {
            entries,
            rejected: list.rejected,
        }
    }

    fn observe(&self, stage: &str, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_stage(stage, started.elapsed().as_secs_f64());
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl PortfolioEntry {
    fn from_outcome(ticker: &Ticker, outcome: Result<SentimentResponse, SentimentError>) -> Self {
        match outcome {
            Ok(sentiment) => Self {
                ticker: ticker.to_string(),
                sentiment: Some(sentiment),
                error: None,
            },
            Err(e) => Self {
                ticker: ticker.to_string(),
                sentiment: None,
                error: Some(e.to_body()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub entries: Vec<PortfolioEntry>,
    /// List entries that failed ticker validation.
    pub rejected: Vec<String>,
}

impl PortfolioReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.sentiment.is_some()).count()
    }
}
