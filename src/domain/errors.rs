use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the sentiment pipeline.
///
/// Every variant maps to a stable machine-readable kind (see [`SentimentError::kind`])
/// so callers can tell "no data" apart from "transport failed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentimentError {
    #[error("Invalid input '{input}': {reason}")]
    Validation { input: String, reason: String },

    #[error("No data found for ${ticker}")]
    NotFound { ticker: String },

    #[error("Upstream {provider} failed: {reason}")]
    Upstream { provider: String, reason: String },

    #[error("No posts left to aggregate for ${ticker}")]
    EmptyInput { ticker: String },

    #[error("Request cancelled before {stage}")]
    Cancelled { stage: String },
}

impl SentimentError {
    pub fn validation(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn upstream(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Stable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::EmptyInput { .. } => "empty_input",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// HTTP-equivalent status for the error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::EmptyInput { .. } => 422,
            Self::Cancelled { .. } => 499,
            Self::Upstream { .. } => 502,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

/// Wire form of a [`SentimentError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}
