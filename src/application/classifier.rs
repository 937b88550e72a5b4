//! Per-post polarity classification.
//!
//! Two interchangeable strategies sit behind [`PostClassifier`]:
//! - [`PlatformTagClassifier`] trusts the tag the source platform attached
//! - [`LexiconClassifier`] scores the text against a [`Lexicon`]
//!
//! Classifying a post depends only on the post and the read-only lexicon, so a
//! batch may be classified on the rayon pool without changing the result.

use crate::domain::lexicon::Lexicon;
use crate::domain::sentiment::{
    ClassificationStrategy, ClassifiedPost, PlatformTag, RawPost, SentimentLabel,
};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub trait PostClassifier: Send + Sync {
    fn strategy(&self) -> ClassificationStrategy;

    /// Label and score a single post. Never fails; malformed input is neutral.
    fn classify(&self, post: RawPost) -> ClassifiedPost;
}

/// Maps the platform tag 1:1 onto a label with a sentinel score.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformTagClassifier;

impl PostClassifier for PlatformTagClassifier {
    fn strategy(&self) -> ClassificationStrategy {
        ClassificationStrategy::PlatformTag
    }

    fn classify(&self, post: RawPost) -> ClassifiedPost {
        let label = match post.platform_tag {
            Some(PlatformTag::Bullish) => SentimentLabel::Bullish,
            Some(PlatformTag::Bearish) => SentimentLabel::Bearish,
            None => SentimentLabel::Neutral,
        };

        ClassifiedPost {
            score: label.sentinel_score(),
            label,
            post,
        }
    }
}

/// Scores text as the token-count-normalized sum of lexicon weights.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    lexicon: Arc<Lexicon>,
}

impl LexiconClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// `sum(weights) / max(1, token_count)`.
    ///
    /// Unknown tokens weigh 0 but still count in the denominator.
    pub fn comparative(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let sum = tokens
            .iter()
            .fold(0.0, |acc, token| acc + self.lexicon.weight(token));
        sum / tokens.len().max(1) as f64
    }
}

impl PostClassifier for LexiconClassifier {
    fn strategy(&self) -> ClassificationStrategy {
        ClassificationStrategy::Lexicon
    }

    fn classify(&self, post: RawPost) -> ClassifiedPost {
        let score = self.comparative(&post.text);

        ClassifiedPost {
            label: SentimentLabel::from_comparative(score),
            score,
            post,
        }
    }
}

/// Lowercase and split on anything that is not alphanumeric.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_classifier(
    strategy: ClassificationStrategy,
    lexicon: Arc<Lexicon>,
) -> Arc<dyn PostClassifier> {
    match strategy {
        ClassificationStrategy::PlatformTag => Arc::new(PlatformTagClassifier),
        ClassificationStrategy::Lexicon => Arc::new(LexiconClassifier::new(lexicon)),
    }
}

/// Classify a batch, in parallel once it reaches `parallel_threshold` posts.
///
/// Output order always matches input order.
pub fn classify_all(
    classifier: &dyn PostClassifier,
    posts: Vec<RawPost>,
    parallel_threshold: usize,
) -> Vec<ClassifiedPost> {
    if posts.len() >= parallel_threshold.max(1) {
        debug!(
            "Classifying {} posts on the rayon pool ({})",
            posts.len(),
            classifier.strategy()
        );
        posts
            .into_par_iter()
            .map(|post| classifier.classify(post))
            .collect()
    } else {
        posts
            .into_iter()
            .map(|post| classifier.classify(post))
            .collect()
    }
}
