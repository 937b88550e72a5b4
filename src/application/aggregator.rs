use crate::domain::errors::SentimentError;
use crate::domain::sentiment::{AggregateResult, ClassifiedPost, SentimentCounts};
use crate::domain::ticker::Ticker;

/// Reduce classified posts to counts, a mean score and a strict-majority label.
///
/// Zero posts is an error, never an all-zero neutral result. Counting and the
/// mean are order-independent; the post list keeps the input order.
pub fn aggregate(
    ticker: &Ticker,
    posts: Vec<ClassifiedPost>,
) -> Result<AggregateResult, SentimentError> {
    if posts.is_empty() {
        return Err(SentimentError::EmptyInput {
            ticker: ticker.to_string(),
        });
    }

    let mut counts = SentimentCounts::default();
    let mut score_sum = 0.0;
    for post in &posts {
        counts.record(post.label);
        score_sum += post.score;
    }

    Ok(AggregateResult {
        ticker: ticker.clone(),
        tweet_count: counts.total(),
        bullish_count: counts.bullish,
        neutral_count: counts.neutral,
        bearish_count: counts.bearish,
        overall_score: Some(score_sum / posts.len() as f64),
        label: counts.majority_label(),
        posts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::{RawPost, SentimentLabel};

    fn ticker() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    fn classified(label: SentimentLabel, score: f64) -> ClassifiedPost {
        ClassifiedPost {
            post: RawPost::new(None, "", "t", None),
            score,
            label,
        }
    }

    fn batch(bullish: usize, neutral: usize, bearish: usize) -> Vec<ClassifiedPost> {
        let mut posts = Vec::new();
        posts.extend((0..bullish).map(|_| classified(SentimentLabel::Bullish, 1.0)));
        posts.extend((0..neutral).map(|_| classified(SentimentLabel::Neutral, 0.0)));
        posts.extend((0..bearish).map(|_| classified(SentimentLabel::Bearish, -1.0)));
        posts
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = aggregate(&ticker(), Vec::new()).unwrap_err();
        assert_eq!(err, SentimentError::EmptyInput { ticker: "AAPL".to_string() });
    }

    #[test]
    fn test_counts_always_add_up() {
        for (b, n, r) in [(1, 0, 0), (0, 4, 0), (3, 3, 3), (10, 2, 7), (0, 0, 1)] {
            let result = aggregate(&ticker(), batch(b, n, r)).unwrap();
            assert_eq!(
                result.bullish_count + result.neutral_count + result.bearish_count,
                result.tweet_count
            );
            assert_eq!(result.tweet_count, b + n + r);
            assert_eq!(result.posts.len(), result.tweet_count);
        }
    }

    #[test]
    fn test_tie_resolves_to_neutral() {
        let result = aggregate(&ticker(), batch(3, 0, 3)).unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_strict_majority_bullish() {
        let result = aggregate(&ticker(), batch(5, 1, 2)).unwrap();
        assert_eq!(result.label, SentimentLabel::Bullish);
    }

    #[test]
    fn test_neutral_dominance_wins_over_polar_plurality() {
        let result = aggregate(&ticker(), batch(2, 3, 0)).unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_overall_score_is_mean() {
        let posts = vec![
            classified(SentimentLabel::Bullish, 2.0),
            classified(SentimentLabel::Neutral, 0.25),
            classified(SentimentLabel::Bearish, -0.75),
        ];
        let result = aggregate(&ticker(), posts).unwrap();
        let score = result.overall_score.unwrap();
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_order_independent() {
        let mut posts = batch(4, 2, 3);
        let forward = aggregate(&ticker(), posts.clone()).unwrap();
        posts.reverse();
        let reversed = aggregate(&ticker(), posts).unwrap();

        assert_eq!(forward.counts(), reversed.counts());
        assert_eq!(forward.label, reversed.label);
        assert!((forward.overall_score.unwrap() - reversed.overall_score.unwrap()).abs() < 1e-12);
    }
}
