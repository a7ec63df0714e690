//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The
//! taxonomy matters: the invoker retries `RateLimited` and nothing else, so
//! kinds are never collapsed into a generic message.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the PaperLens core.
#[derive(Error, Debug)]
pub enum Error {
    /// Server signalled quota exhaustion (HTTP 429). The only retryable kind.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Network/connection failure or a non-2xx status other than 429.
    /// Carries the server-provided message when one was available.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Generated text was not valid JSON after fence stripping.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Response contained no generated text.
    #[error("no content generated")]
    EmptyResponse,

    /// Invalid construction-time configuration. Fatal, never retried.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the invoker's bounded retry loop may re-attempt after this
    /// failure. True only for rate-limit rejections, which resolve on their
    /// own as the server quota refills.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_))
    }
}

// Convenience constructors
impl Error {
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
