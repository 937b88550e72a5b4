//! Signed word lexicon for financial short text.
//!
//! The lexicon is two layers: a table of financial terms with integer weights
//! (-4..=4) and an optional base valence source for general vocabulary. A token
//! found in the financial table never consults the base layer.
//!
//! Built once at startup and shared read-only (`Arc<Lexicon>`).

use std::collections::HashMap;
use std::fmt;

/// General-purpose polarity for a single lowercase token.
pub trait ValenceSource: Send + Sync {
    /// Signed valence, or `None` when the token is unknown.
    fn valence(&self, token: &str) -> Option<f64>;
}

/// Financial jargon that general-purpose lexicons miss or misread.
const FINANCIAL_TERMS: &[(&str, i32)] = &[
    // Bullish
    ("moon", 4),
    ("mooning", 4),
    ("skyrocket", 4),
    ("skyrockets", 4),
    ("tendies", 3),
    ("bullish", 3),
    ("bull", 3),
    ("bulls", 2),
    ("breakout", 3),
    ("rally", 3),
    ("rallies", 3),
    ("rallying", 3),
    ("soar", 3),
    ("soars", 3),
    ("soaring", 3),
    ("surge", 3),
    ("surges", 3),
    ("surging", 3),
    ("ripping", 3),
    ("squeeze", 3),
    ("undervalued", 3),
    ("uptrend", 3),
    ("upgrade", 3),
    ("upgraded", 3),
    ("outperform", 3),
    ("beat", 2),
    ("beats", 2),
    ("exceeds", 2),
    ("exceeded", 2),
    ("buy", 2),
    ("buying", 2),
    ("bought", 2),
    ("long", 2),
    ("calls", 2),
    ("accumulate", 2),
    ("accumulating", 2),
    ("upside", 2),
    ("oversold", 2),
    ("rebound", 2),
    ("recovery", 2),
    ("gains", 2),
    ("profit", 2),
    ("profits", 2),
    ("growth", 2),
    ("record", 2),
    ("raised", 2),
    ("green", 1),
    ("gain", 1),
    ("dividend", 1),
    ("hold", 1),
    // Bearish
    ("red", -1),
    ("sold", -1),
    ("sell", -2),
    ("selling", -2),
    ("short", -2),
    ("shorts", -2),
    ("shorting", -2),
    ("puts", -2),
    ("miss", -2),
    ("misses", -2),
    ("missed", -2),
    ("loss", -2),
    ("losses", -2),
    ("decline", -2),
    ("declines", -2),
    ("weak", -2),
    ("lowered", -2),
    ("layoffs", -2),
    ("recall", -2),
    ("offering", -2),
    ("overbought", -2),
    ("downside", -2),
    ("bearish", -3),
    ("bear", -3),
    ("bears", -2),
    ("plunge", -3),
    ("plunges", -3),
    ("plunging", -3),
    ("tank", -3),
    ("tanks", -3),
    ("tanking", -3),
    ("dump", -3),
    ("dumps", -3),
    ("dumping", -3),
    ("selloff", -3),
    ("bleeding", -3),
    ("downgrade", -3),
    ("downgraded", -3),
    ("underperform", -3),
    ("overvalued", -3),
    ("downtrend", -3),
    ("dilution", -3),
    ("lawsuit", -3),
    ("bagholder", -3),
    ("bagholders", -3),
    ("capitulation", -3),
    ("crash", -4),
    ("crashes", -4),
    ("crashing", -4),
    ("bankrupt", -4),
    ("bankruptcy", -4),
    ("fraud", -4),
    ("scam", -4),
    ("rugpull", -4),
];

pub struct Lexicon {
    overrides: HashMap<String, i32>,
    base: Option<Box<dyn ValenceSource>>,
}

impl Lexicon {
    /// Lexicon with no entries at all.
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
            base: None,
        }
    }

    /// Financial term table only, no base layer.
    pub fn financial() -> Self {
        let overrides = FINANCIAL_TERMS
            .iter()
            .map(|(term, weight)| (term.to_string(), *weight))
            .collect();

        Self {
            overrides,
            base: None,
        }
    }

    /// Attach a base valence layer beneath the financial terms.
    pub fn with_base(mut self, base: impl ValenceSource + 'static) -> Self {
        self.base = Some(Box::new(base));
        self
    }

    /// Add or replace a financial-layer entry.
    pub fn with_override(mut self, token: &str, weight: i32) -> Self {
        self.overrides.insert(token.to_lowercase(), weight);
        self
    }

    /// Weight of a token, case-insensitive. Unknown tokens weigh 0.
    pub fn weight(&self, token: &str) -> f64 {
        let key = token.to_lowercase();

        if let Some(weight) = self.overrides.get(&key) {
            return f64::from(*weight);
        }

        self.base
            .as_ref()
            .and_then(|base| base.valence(&key))
            .unwrap_or(0.0)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::financial()
    }
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("overrides", &self.overrides.len())
            .field("base", &self.base.is_some())
            .finish()
    }
}
