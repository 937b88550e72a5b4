use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::classifier::build_classifier;
use crate::application::pipeline::SentimentPipeline;
use crate::application::result_builder::ResultBuilder;
use crate::config::Config;
use crate::domain::lexicon::Lexicon;
use crate::domain::ports::PostSource;
use crate::infrastructure::mock::StaticPostSource;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::sentiment::VaderValence;
use crate::infrastructure::stocktwits::StocktwitsPostSource;

/// Where posts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Stocktwits,
    /// Built-in fixtures, no network.
    Offline,
}

pub struct SentimentHandle {
    pub pipeline: SentimentPipeline,
    pub lexicon: Arc<Lexicon>,
    pub metrics: Metrics,
}

pub struct SentimentBootstrap;

impl SentimentBootstrap {
    /// Financial terms over the VADER base layer. Build once per process.
    pub fn build_lexicon() -> Arc<Lexicon> {
        Arc::new(Lexicon::financial().with_base(VaderValence::new()))
    }

    pub fn build_source(config: &Config, mode: SourceMode) -> Arc<dyn PostSource> {
        match mode {
            SourceMode::Stocktwits => Arc::new(StocktwitsPostSource::new(
                &config.stocktwits.base_url,
                config.stocktwits.timeout,
                config.stocktwits.max_retries,
            )),
            SourceMode::Offline => Arc::new(StaticPostSource::demo()),
        }
    }

    pub fn init(config: &Config, source: Arc<dyn PostSource>) -> Result<SentimentHandle> {
        let lexicon = Self::build_lexicon();
        let metrics = Metrics::new()?;
        metrics.lexicon_entries.set(lexicon.override_count() as f64);

        let classifier = build_classifier(config.sentiment.strategy, lexicon.clone());
        let pipeline = SentimentPipeline::new(source.clone(), classifier)
            .with_result_builder(ResultBuilder::new(
                config.sentiment.display_cap,
                config.sentiment.score_policy,
            ))
            .with_parallel_threshold(config.sentiment.parallel_threshold)
            .with_metrics(metrics.clone());

        info!(
            "Sentiment pipeline ready: source={}, strategy={}, lexicon={:?}",
            source.name(),
            config.sentiment.strategy,
            lexicon
        );

        Ok(SentimentHandle {
            pipeline,
            lexicon,
            metrics,
        })
    }
}
