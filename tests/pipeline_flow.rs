use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tickerpulse::application::classifier::{LexiconClassifier, PlatformTagClassifier};
use tickerpulse::application::pipeline::{CancelSignal, SentimentPipeline};
use tickerpulse::application::result_builder::ResultBuilder;
use tickerpulse::domain::errors::SentimentError;
use tickerpulse::domain::lexicon::Lexicon;
use tickerpulse::domain::ports::PostSource;
use tickerpulse::domain::sentiment::{
    ClassificationStrategy, PlatformTag, RawPost, ScorePolicy, SentimentLabel,
};
use tickerpulse::domain::ticker::Ticker;
use tickerpulse::infrastructure::StaticPostSource;
use tickerpulse::infrastructure::observability::Metrics;

fn post(id: usize, text: &str, tag: Option<PlatformTag>) -> RawPost {
    RawPost::new(Some(id.to_string()), text, format!("user{}", id), tag)
}

/// 6 bullish tags, 1 bearish tag, 3 untagged.
fn tagged_stream() -> Vec<RawPost> {
    let mut posts = Vec::new();
    for i in 0..6 {
        posts.push(post(i, "going up", Some(PlatformTag::Bullish)));
    }
    posts.push(post(6, "going down", Some(PlatformTag::Bearish)));
    for i in 7..10 {
        posts.push(post(i, "no opinion", None));
    }
    posts
}

fn tag_pipeline(source: Arc<dyn PostSource>) -> SentimentPipeline {
    SentimentPipeline::new(source, Arc::new(PlatformTagClassifier))
}

fn lexicon_pipeline(source: Arc<dyn PostSource>) -> SentimentPipeline {
    SentimentPipeline::new(
        source,
        Arc::new(LexiconClassifier::new(Arc::new(Lexicon::financial()))),
    )
}

// Source that always fails the way a broken transport would
struct FailingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl PostSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_posts(
        &self,
        _ticker: &Ticker,
        _limit: usize,
    ) -> Result<Vec<RawPost>, SentimentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SentimentError::upstream("failing", "connection reset by peer"))
    }
}

// Source that raises the cancel flag while "fetching"
struct CancellingSource {
    cancel: CancelSignal,
    posts: Vec<RawPost>,
}

#[async_trait]
impl PostSource for CancellingSource {
    fn name(&self) -> &str {
        "cancelling"
    }

    async fn fetch_posts(
        &self,
        _ticker: &Ticker,
        _limit: usize,
    ) -> Result<Vec<RawPost>, SentimentError> {
        self.cancel.cancel();
        Ok(self.posts.clone())
    }
}

#[tokio::test]
async fn test_end_to_end_tag_strategy() {
    let source = Arc::new(StaticPostSource::new().with_posts("AAPL", tagged_stream()));
    let pipeline = tag_pipeline(source);

    let response = pipeline
        .run("$aapl", 30, &CancelSignal::new())
        .await
        .expect("pipeline should succeed");

    let result = &response.result;
    assert_eq!(result.ticker.as_str(), "AAPL");
    assert_eq!(result.tweet_count, 10);
    assert_eq!(result.bullish_count, 6);
    assert_eq!(result.bearish_count, 1);
    assert_eq!(result.neutral_count, 3);
    assert_eq!(result.label, SentimentLabel::Bullish);
    assert_eq!(response.strategy, ClassificationStrategy::PlatformTag);

    let breakdown = response.breakdown;
    assert_eq!(breakdown.bullish_pct, 60);
    assert_eq!(breakdown.neutral_pct, 30);
    assert_eq!(breakdown.bearish_pct, 10);

    // Mean of sentinels: (6 - 1) / 10
    let score = result.overall_score.expect("score policy is Always");
    assert!((score - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_end_to_end_lexicon_strategy() {
    let posts = vec![
        post(1, "$TSLA rally, buying calls", None),
        post(2, "Deliveries crash, dumping shares", Some(PlatformTag::Bullish)),
        post(3, "moon", None),
        post(4, "watching from the sidelines today", None),
        post(5, "beats", None),
    ];
    let source = Arc::new(StaticPostSource::new().with_posts("TSLA", posts));
    let pipeline = lexicon_pipeline(source);

    let response = pipeline.run("tsla", 30, &CancelSignal::new()).await.unwrap();
    let labels: Vec<SentimentLabel> = response.result.posts.iter().map(|p| p.label).collect();

    assert_eq!(
        labels,
        vec![
            SentimentLabel::Bullish,
            SentimentLabel::Bearish,
            SentimentLabel::Bullish,
            SentimentLabel::Neutral,
            SentimentLabel::Bullish,
        ]
    );
    assert_eq!(response.result.label, SentimentLabel::Bullish);
    assert_eq!(response.strategy, ClassificationStrategy::Lexicon);
}

#[tokio::test]
async fn test_invalid_ticker_never_reaches_source() {
    let source = Arc::new(StaticPostSource::demo());
    let pipeline = tag_pipeline(source.clone());

    for input in ["", "   ", "$", "TOOLONG", "12"] {
        let err = pipeline.run(input, 30, &CancelSignal::new()).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error", "input {:?}", input);
    }
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_zero_limit_is_rejected_before_fetch() {
    let source = Arc::new(StaticPostSource::demo());
    let pipeline = tag_pipeline(source.clone());

    let err = pipeline.run("AAPL", 0, &CancelSignal::new()).await.unwrap_err();
    assert_eq!(err.kind(), "validation_error");
    assert_eq!(source.call_count(), 0);

    // The ticker was fine; the message must point at the limit
    let message = err.to_string();
    assert!(message.contains("limit=0"), "{}", message);
    assert!(!message.contains("AAPL"), "{}", message);
    assert!(!message.contains("ticker"), "{}", message);
}

#[tokio::test]
async fn test_not_found_propagates_unchanged() {
    let pipeline = tag_pipeline(Arc::new(StaticPostSource::demo()));

    let err = pipeline.run("ZZZZ", 30, &CancelSignal::new()).await.unwrap_err();
    assert_eq!(err, SentimentError::NotFound { ticker: "ZZZZ".to_string() });
}

#[tokio::test]
async fn test_upstream_error_propagates_unchanged() {
    let source = Arc::new(FailingSource {
        calls: AtomicUsize::new(0),
    });
    let pipeline = tag_pipeline(source.clone());

    let err = pipeline.run("AAPL", 30, &CancelSignal::new()).await.unwrap_err();
    assert_eq!(err, SentimentError::upstream("failing", "connection reset by peer"));
    // No retry in the pipeline
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_successful_fetch_with_no_posts_is_empty_input() {
    let source = Arc::new(StaticPostSource::new().with_posts("WFC", Vec::new()));
    let pipeline = tag_pipeline(source);

    let err = pipeline.run("WFC", 30, &CancelSignal::new()).await.unwrap_err();
    assert_eq!(err, SentimentError::EmptyInput { ticker: "WFC".to_string() });
    assert_ne!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_cancelled_before_classification() {
    let cancel = CancelSignal::new();
    let source = Arc::new(CancellingSource {
        cancel: cancel.clone(),
        posts: tagged_stream(),
    });
    let pipeline = tag_pipeline(source);

    let err = pipeline.run("AAPL", 30, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), "cancelled");
    assert_eq!(err, SentimentError::Cancelled { stage: "classification".to_string() });
}

#[tokio::test]
async fn test_display_cap_truncates_but_counts_everything() {
    let posts: Vec<RawPost> = (0..45)
        .map(|i| post(i, "text", Some(PlatformTag::Bullish)))
        .collect();
    let source = Arc::new(StaticPostSource::new().with_posts("NVDA", posts));
    let pipeline =
        tag_pipeline(source).with_result_builder(ResultBuilder::new(20, ScorePolicy::Always));

    let response = pipeline.run("NVDA", 100, &CancelSignal::new()).await.unwrap();
    assert_eq!(response.result.tweet_count, 45);
    assert_eq!(response.result.posts.len(), 20);
    assert_eq!(response.result.posts[0].post.id, "0");
    assert_eq!(response.result.posts[19].post.id, "19");
}

#[tokio::test]
async fn test_fetch_limit_is_honored() {
    let posts: Vec<RawPost> = (0..12).map(|i| post(i, "text", None)).collect();
    let source = Arc::new(StaticPostSource::new().with_posts("AMD", posts));
    let pipeline = tag_pipeline(source);

    let response = pipeline.run("AMD", 5, &CancelSignal::new()).await.unwrap();
    assert_eq!(response.result.tweet_count, 5);
}

#[tokio::test]
async fn test_parallel_and_sequential_runs_agree() {
    let texts = ["moon", "crash", "meh", "beats and raised", "selling everything", "hold"];
    let posts: Vec<RawPost> = (0..300)
        .map(|i| post(i, texts[i % texts.len()], None))
        .collect();
    let source: Arc<dyn PostSource> = Arc::new(StaticPostSource::new().with_posts("SPY", posts));

    let sequential = lexicon_pipeline(source.clone()).with_parallel_threshold(usize::MAX);
    let parallel = lexicon_pipeline(source).with_parallel_threshold(1);

    let a = sequential.run("SPY", 300, &CancelSignal::new()).await.unwrap();
    let b = parallel.run("SPY", 300, &CancelSignal::new()).await.unwrap();

    assert_eq!(a.result, b.result);
}

#[tokio::test]
async fn test_score_policy_omits_tag_mean() {
    let source = Arc::new(StaticPostSource::new().with_posts("AAPL", tagged_stream()));
    let pipeline = tag_pipeline(source)
        .with_result_builder(ResultBuilder::new(20, ScorePolicy::OmitForTags));

    let response = pipeline.run("AAPL", 30, &CancelSignal::new()).await.unwrap();
    assert!(response.result.overall_score.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("overallScore").is_none());
    assert_eq!(json["scorePolicy"], "omit_for_tags");
}

#[tokio::test]
async fn test_metrics_record_outcomes() {
    let metrics = Metrics::new().unwrap();
    let pipeline = tag_pipeline(Arc::new(StaticPostSource::demo())).with_metrics(metrics.clone());

    pipeline.run("AAPL", 30, &CancelSignal::new()).await.unwrap();
    let _ = pipeline.run("ZZZZ", 30, &CancelSignal::new()).await;

    let output = metrics.render();
    assert!(output.contains("outcome=\"ok\""));
    assert!(output.contains("outcome=\"not_found\""));
    assert!(output.contains("tickerpulse_posts_classified_total"));
}
