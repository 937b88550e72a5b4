use crate::domain::errors::SentimentError;
use crate::domain::ports::PostSource;
use crate::domain::sentiment::{PlatformTag, RawPost};
use crate::domain::ticker::Ticker;
use crate::infrastructure::core::{HttpClientFactory, build_url_with_query};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const PROVIDER: &str = "stocktwits";

/// Stocktwits never returns more than this many messages per page.
pub const MAX_PAGE_SIZE: usize = 30;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    response: Option<ResponseStatus>,
    #[serde(default)]
    messages: Option<Vec<StreamMessage>>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    status: u16,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<StreamUser>,
    #[serde(default)]
    entities: Option<MessageEntities>,
}

#[derive(Debug, Deserialize)]
struct StreamUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct MessageEntities {
    #[serde(default)]
    sentiment: Option<MessageSentiment>,
}

#[derive(Debug, Deserialize)]
struct MessageSentiment {
    basic: Option<String>,
}

impl StreamResponse {
    fn first_error(&self) -> Option<String> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.message.clone())
    }
}

impl From<StreamMessage> for RawPost {
    fn from(message: StreamMessage) -> Self {
        let platform_tag = message
            .entities
            .and_then(|e| e.sentiment)
            .and_then(|s| s.basic)
            .and_then(|basic| PlatformTag::from_platform(&basic));

        RawPost::new(
            message.id.map(|id| id.to_string()),
            message.body.unwrap_or_default(),
            message
                .user
                .map(|u| u.username)
                .unwrap_or_else(|| "unknown".to_string()),
            platform_tag,
        )
    }
}

/// Ingestion adapter for the Stocktwits public symbol stream.
pub struct StocktwitsPostSource {
    client: ClientWithMiddleware,
    base_url: String,
}

impl StocktwitsPostSource {
    pub fn new(base_url: &str, timeout: Duration, max_retries: u32) -> Self {
        Self::with_client(base_url, HttpClientFactory::create_client(timeout, max_retries))
    }

    pub fn with_client(base_url: &str, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn stream_url(&self, ticker: &Ticker, limit: usize) -> String {
        let base = format!("{}/streams/symbol/{}.json", self.base_url, ticker);
        build_url_with_query(&base, &[("limit", limit.min(MAX_PAGE_SIZE).to_string())])
    }
}

/// Turn a decoded stream payload into posts.
///
/// A 404 status or a missing message list means the platform has no data for
/// the ticker; a populated `errors` list is an upstream failure.
fn map_stream_response(
    ticker: &Ticker,
    body: StreamResponse,
    limit: usize,
) -> Result<Vec<RawPost>, SentimentError> {
    if body.response.as_ref().map(|r| r.status) == Some(404) {
        return Err(SentimentError::NotFound {
            ticker: ticker.to_string(),
        });
    }

    if let Some(message) = body.first_error() {
        return Err(SentimentError::upstream(PROVIDER, message));
    }

    let Some(messages) = body.messages else {
        return Err(SentimentError::NotFound {
            ticker: ticker.to_string(),
        });
    };

    Ok(messages.into_iter().take(limit).map(RawPost::from).collect())
}

#[async_trait]
impl PostSource for StocktwitsPostSource {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_posts(
        &self,
        ticker: &Ticker,
        limit: usize,
    ) -> Result<Vec<RawPost>, SentimentError> {
        let url = self.stream_url(ticker, limit);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SentimentError::upstream(PROVIDER, format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SentimentError::NotFound {
                ticker: ticker.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            SentimentError::upstream(PROVIDER, format!("failed to read body: {}", e))
        })?;
        let decoded = serde_json::from_slice::<StreamResponse>(&bytes);

        if !status.is_success() {
            let detail = decoded
                .ok()
                .and_then(|body| body.first_error())
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(SentimentError::upstream(PROVIDER, detail));
        }

        let body = decoded.map_err(|e| {
            SentimentError::upstream(PROVIDER, format!("invalid payload: {}", e))
        })?;
        let posts = map_stream_response(ticker, body, limit)?;

        info!("Fetched {} Stocktwits messages for ${}", posts.len(), ticker);
        Ok(posts)
    }
}
