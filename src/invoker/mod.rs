//! Resilient invoker - bounded retry around one outbound call.
//!
//! Wraps a single attempt-producing backend with exponential backoff. Retry
//! is narrowly scoped: only a rate-limit rejection is re-attempted, because
//! that is the one failure expected to self-resolve as the server quota
//! refills. Everything else (bad request, server fault, unparseable output)
//! propagates immediately so the real cause is not masked by wasted retries.

use async_trait::async_trait;
use tokio::time::sleep;

use crate::client::response;
use crate::types::{Result, RetryConfig};

/// One unit of analysis work. The core treats both fields as opaque text;
/// how the payload was produced (PDF extraction etc.) is a collaborator
/// concern.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Facet instructions sent ahead of the source text.
    pub prompt: String,
    /// Source document text.
    pub payload: String,
}

impl AnalysisRequest {
    pub fn new(prompt: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            payload: payload.into(),
        }
    }
}

/// A single attempt of the underlying call: request in, raw generated text
/// out. `GeminiClient` is the production implementation; tests substitute
/// scripted fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn generate(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Resilient invoker - drives one invocation through to a parsed document.
#[derive(Debug)]
pub struct ResilientInvoker<B> {
    backend: B,
    config: RetryConfig,
}

impl<B: AnalysisBackend> ResilientInvoker<B> {
    pub fn new(backend: B, config: RetryConfig) -> Self {
        Self { backend, config }
    }

    /// Execute the call, retrying rate-limit rejections with exponential
    /// backoff (`initial_delay * 2^attempt`), at most `max_retries` retries.
    ///
    /// On success the generated text is fence-stripped and parsed; a parse
    /// failure is terminal, never retried.
    pub async fn invoke(&self, request: &AnalysisRequest) -> Result<serde_json::Value> {
        let mut attempt: u32 = 0;
        loop {
            match self.backend.generate(request).await {
                Ok(text) => return response::parse_document(&text),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off before retry"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "invocation failed");
                    return Err(err);
                }
            }
        }
    }
}
