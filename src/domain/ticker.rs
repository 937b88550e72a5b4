use crate::domain::errors::SentimentError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TICKER_LEN: usize = 5;

/// Characters that separate entries in a free-form ticker list.
const LIST_SEPARATORS: &[char] = &[',', ';', '|'];

/// Strip whitespace and leading `$` signs, then uppercase.
///
/// Does not validate; see [`Ticker::parse`].
pub fn normalize(input: &str) -> String {
    input
        .trim_start_matches(|c: char| c == '$' || c.is_whitespace())
        .trim_end()
        .to_ascii_uppercase()
}

/// Normalized stock symbol: 1-5 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, SentimentError> {
        let normalized = normalize(input);

        if normalized.is_empty() {
            return Err(SentimentError::validation(input, "ticker is required"));
        }

        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(SentimentError::validation(
                input,
                format!("ticker has {} characters, max is {}", len, MAX_TICKER_LEN),
            ));
        }

        if let Some(ch) = normalized.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(SentimentError::validation(
                input,
                format!("ticker contains unexpected character '{}'", ch),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = SentimentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

/// Result of parsing a free-form list such as a stored portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerList {
    pub tickers: Vec<Ticker>,
    /// Normalized entries that are not valid tickers, in input order.
    pub rejected: Vec<String>,
}

/// Split on whitespace, `,`, `;` and `|` and normalize every entry.
pub fn parse_ticker_list(raw: &str) -> TickerList {
    let mut list = TickerList::default();

    for entry in raw.split(|c: char| c.is_whitespace() || LIST_SEPARATORS.contains(&c)) {
        let normalized = normalize(entry);
        if normalized.is_empty() {
            continue;
        }
        match Ticker::parse(&normalized) {
            Ok(ticker) => list.tickers.push(ticker),
            Err(_) => list.rejected.push(normalized),
        }
    }

    list
}
