use crate::domain::ticker::Ticker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Comparative scores above this are bullish.
pub const BULLISH_THRESHOLD: f64 = 0.5;
/// Comparative scores below this are bearish.
pub const BEARISH_THRESHOLD: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "bearish",
        }
    }

    /// Threshold a comparative score. Both bounds are exclusive.
    pub fn from_comparative(score: f64) -> Self {
        if score > BULLISH_THRESHOLD {
            Self::Bullish
        } else if score < BEARISH_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    /// Fixed score used when the label did not come from scoring.
    pub fn sentinel_score(&self) -> f64 {
        match self {
            Self::Bullish => 1.0,
            Self::Neutral => 0.0,
            Self::Bearish => -1.0,
        }
    }
}

/// Polarity attached to a post by its source platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Bullish,
    Bearish,
}

impl PlatformTag {
    /// Map a platform-provided tag string. Unknown values yield `None`.
    pub fn from_platform(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("bullish") {
            Some(Self::Bullish)
        } else if value.eq_ignore_ascii_case("bearish") {
            Some(Self::Bearish)
        } else {
            None
        }
    }
}

/// A post as delivered by the ingestion source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: String,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_tag: Option<PlatformTag>,
}

impl RawPost {
    /// Build a post, generating an id when the platform did not assign one.
    pub fn new(
        id: Option<String>,
        text: impl Into<String>,
        author: impl Into<String>,
        platform_tag: Option<PlatformTag>,
    ) -> Self {
        Self {
            id: id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: text.into(),
            author: author.into(),
            platform_tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPost {
    #[serde(flatten)]
    pub post: RawPost,
    pub score: f64,
    pub label: SentimentLabel,
}

/// Which classifier produced the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationStrategy {
    #[serde(rename = "tag")]
    PlatformTag,
    Lexicon,
}

impl fmt::Display for ClassificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlatformTag => write!(f, "tag"),
            Self::Lexicon => write!(f, "lexicon"),
        }
    }
}

impl FromStr for ClassificationStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "platform" | "platform-tag" => Ok(Self::PlatformTag),
            "lexicon" => Ok(Self::Lexicon),
            _ => anyhow::bail!("Invalid strategy: {}. Must be 'tag' or 'lexicon'", s),
        }
    }
}

/// Whether `overallScore` is reported for tag-only results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    #[default]
    Always,
    OmitForTags,
}

impl FromStr for ScorePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "omit_for_tags" | "omit-for-tags" => Ok(Self::OmitForTags),
            _ => anyhow::bail!(
                "Invalid score policy: {}. Must be 'always' or 'omit_for_tags'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub bullish: usize,
    pub neutral: usize,
    pub bearish: usize,
}

impl SentimentCounts {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Bullish => self.bullish += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Bearish => self.bearish += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.bullish + self.neutral + self.bearish
    }

    /// Strict majority: a polar label wins only if it beats both other counts.
    /// Ties and neutral dominance resolve to neutral.
    pub fn majority_label(&self) -> SentimentLabel {
        if self.bullish > self.bearish && self.bullish > self.neutral {
            SentimentLabel::Bullish
        } else if self.bearish > self.bullish && self.bearish > self.neutral {
            SentimentLabel::Bearish
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub ticker: Ticker,
    pub tweet_count: usize,
    pub bullish_count: usize,
    pub neutral_count: usize,
    pub bearish_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    pub label: SentimentLabel,
    pub posts: Vec<ClassifiedPost>,
}

impl AggregateResult {
    pub fn counts(&self) -> SentimentCounts {
        SentimentCounts {
            bullish: self.bullish_count,
            neutral: self.neutral_count,
            bearish: self.bearish_count,
        }
    }
}

/// Whole-number percentages that always sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentBreakdown {
    pub bullish_pct: u32,
    pub neutral_pct: u32,
    pub bearish_pct: u32,
}

impl SentimentBreakdown {
    pub fn from_counts(counts: &SentimentCounts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self::default();
        }

        let pct = |n: usize| ((n as f64 / total as f64) * 100.0).round() as u32;
        let bullish_pct = pct(counts.bullish);
        // Two rounded-up halves can overshoot 100
        let neutral_pct = pct(counts.neutral).min(100 - bullish_pct);

        Self {
            bullish_pct,
            neutral_pct,
            bearish_pct: 100 - bullish_pct - neutral_pct,
        }
    }
}

/// Response handed back to callers of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    #[serde(flatten)]
    pub result: AggregateResult,
    pub breakdown: SentimentBreakdown,
    pub strategy: ClassificationStrategy,
    pub score_policy: ScorePolicy,
    pub generated_at: DateTime<Utc>,
}
