//! Prometheus metrics definitions for tickerpulse
//!
//! All metrics use the `tickerpulse_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the sentiment pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Pipeline runs by outcome (`ok` or an error kind)
    pub requests_total: CounterVec,
    /// Classified posts by strategy and label
    pub posts_classified_total: CounterVec,
    /// Stage latency in seconds
    pub stage_latency_seconds: HistogramVec,
    /// Number of financial overrides in the loaded lexicon
    pub lexicon_entries: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new(
                "tickerpulse_requests_total",
                "Pipeline runs by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let posts_classified_total = CounterVec::new(
            Opts::new(
                "tickerpulse_posts_classified_total",
                "Classified posts by strategy and label",
            ),
            &["strategy", "label"],
        )?;
        registry.register(Box::new(posts_classified_total.clone()))?;

        let stage_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "tickerpulse_stage_latency_seconds",
                "Pipeline stage latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["stage"],
        )?;
        registry.register(Box::new(stage_latency_seconds.clone()))?;

        let lexicon_entries = Gauge::with_opts(Opts::new(
            "tickerpulse_lexicon_entries",
            "Financial override terms in the loaded lexicon",
        ))?;
        registry.register(Box::new(lexicon_entries.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            posts_classified_total,
            stage_latency_seconds,
            lexicon_entries,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_request(&self, outcome: &str) {
        self.requests_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_classified(&self, strategy: &str, label: &str, count: usize) {
        self.posts_classified_total
            .with_label_values(&[strategy, label])
            .inc_by(count as f64);
    }

    pub fn observe_stage(&self, stage: &str, seconds: f64) {
        self.stage_latency_seconds
            .with_label_values(&[stage])
            .observe(seconds);
    }
}
