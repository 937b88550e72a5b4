//! General-purpose valence from the VADER lexicon.
//!
//! The crate only exposes the normalized compound score, so the raw valence of
//! a single token is recovered by inverting `compound = x / sqrt(x^2 + alpha)`.

use crate::domain::lexicon::ValenceSource;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Normalization constant VADER uses for the compound score.
const VADER_ALPHA: f64 = 15.0;

/// Largest magnitude in the VADER lexicon.
const MAX_VALENCE: f64 = 4.0;

pub struct VaderValence {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderValence {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderValence {
    fn default() -> Self {
        Self::new()
    }
}

impl ValenceSource for VaderValence {
    fn valence(&self, token: &str) -> Option<f64> {
        if token.is_empty() {
            return None;
        }

        let compound = self.analyzer.polarity_scores(token)["compound"];
        if compound == 0.0 {
            return None;
        }

        let squared = compound * compound;
        if squared >= 1.0 {
            return Some(compound.signum() * MAX_VALENCE);
        }

        let valence = compound * (VADER_ALPHA / (1.0 - squared)).sqrt();
        Some(valence.clamp(-MAX_VALENCE, MAX_VALENCE))
    }
}
