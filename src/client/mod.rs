//! Gemini HTTP backend.
//!
//! One `generate` call is one HTTP POST to the `generateContent` endpoint.
//! Failure classification happens here, at the transport boundary:
//!   - 429 → `Error::RateLimited` (the invoker's only retry trigger)
//!   - other non-2xx → `Error::Transport`, carrying the server's
//!     `error.message` when the body provides one
//!   - missing generated text → `Error::EmptyResponse`

pub mod response;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::invoker::{AnalysisBackend, AnalysisRequest};
use crate::types::{Error, GeminiConfig, Result};

// =============================================================================
// Wire Types
// =============================================================================

/// generateContent request body: `{"contents":[{"parts":[{"text":...},...]}]}`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// generateContent response body. Only the path
/// `candidates[0].content.parts[0].text` is consumed; everything else the
/// server sends is ignored.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Error envelope on non-2xx responses: `{"error":{"message":...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Gemini generateContent client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Pull the server's error message out of a non-2xx body, falling back
    /// to a generic label when the body is not the documented envelope.
    fn error_message(status: StatusCode, body: &str) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|err| err.message)
            .unwrap_or_else(|| format!("API error: HTTP {}", status.as_u16()))
    }
}

#[async_trait]
impl AnalysisBackend for GeminiClient {
    async fn generate(&self, request: &AnalysisRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: &request.prompt,
                    },
                    Part {
                        text: &request.payload,
                    },
                ],
            }],
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(status, &body);
            tracing::debug!(status = status.as_u16(), %message, "generateContent rejected");
            return if status == StatusCode::TOO_MANY_REQUESTS {
                Err(Error::rate_limited(message))
            } else {
                Err(Error::transport(message))
            };
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or(Error::EmptyResponse)?;

        Ok(text)
    }
}
