//! Collaborator traits: text generation and video search

use edufinder_core::VideoInfo;
use reqwest::Client;
use std::time::Duration;

/// Result type for generation calls
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Text generation error types
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no generation provider configured: {0}")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited")]
    RateLimited,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("provider returned no text")]
    Empty,

    #[error("network error: {0}")]
    NetworkError(reqwest::Error),
}

impl From<reqwest::Error> for GenerationError {
    /// Request URLs can carry credentials, so they never reach the message.
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkError(e.without_url())
    }
}

/// HTTP client with a whole-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::warn!("HTTP client build failed ({}), using defaults", e.without_url());
        Client::new()
    })
}

/// A generative text service: prompt in, text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// A video search service. Implementations return an empty list when the
/// provider is unavailable; they never fail.
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Vec<VideoInfo>;
}

/// Generator used when no API key is configured. Every call fails with
/// [`GenerationError::NotConfigured`], which workers forward as a failure reply.
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for UnavailableGenerator {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        Err(GenerationError::NotConfigured(self.reason.clone()))
    }
}

/// Video search that never finds anything.
pub struct NoVideoSearch;

#[async_trait::async_trait]
impl VideoSearch for NoVideoSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Vec<VideoInfo> {
        Vec::new()
    }
}
