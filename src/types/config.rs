//! Configuration structures.
//!
//! All values are fixed at construction; there is no runtime reconfiguration.
//! Defaults match the quotas the production Gemini key is provisioned for.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{Error, Result};

/// Default Gemini generateContent endpoint.
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.0-flash:generateContent";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Admission governor pacing.
    #[serde(default)]
    pub governor: GovernorConfig,

    /// Invoker retry behaviour.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Gemini endpoint and credentials.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// What to do when one facet of a fan-out fails.
    #[serde(default)]
    pub facet_failure_policy: FacetFailurePolicy,
}

/// Admission governor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Sliding window duration.
    #[serde(with = "humantime_serde")]
    pub window: Duration,

    /// Maximum admissions inside one trailing window.
    pub max_calls_per_window: u32,

    /// Minimum spacing between any two consecutive admissions.
    #[serde(with = "humantime_serde")]
    pub min_inter_call_gap: Duration,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_calls_per_window: 10,
            min_inter_call_gap: Duration::from_secs(2),
        }
    }
}

impl GovernorConfig {
    /// Reject degenerate pacing values up front rather than dividing by zero
    /// or spinning inside `acquire_slot`.
    pub fn validate(&self) -> Result<()> {
        if self.window.is_zero() {
            return Err(Error::config("governor window must be non-zero"));
        }
        if self.max_calls_per_window == 0 {
            return Err(Error::config("max_calls_per_window must be at least 1"));
        }
        Ok(())
    }
}

/// Invoker retry configuration. The backoff multiplier is fixed at 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,

    /// Delay before the first retry; doubles each subsequent retry.
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Backoff delay before retry `attempt` (0-indexed): `initial_delay * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(1u32 << attempt.min(31))
    }
}

/// Gemini client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// generateContent endpoint URL.
    pub endpoint: String,

    /// API key, passed as the `key` query parameter.
    pub api_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_key: String::new(),
        }
    }
}

/// Policy for a facet fan-out where one facet fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetFailurePolicy {
    /// Abort the remaining facets as soon as one fails.
    FailFast,
    /// Let every facet run to completion, then report the first failure.
    #[default]
    CompleteAll,
}
