//! Core types for PaperLens.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error taxonomy with thiserror derives
//! - **Config**: Construction-time configuration for governor, retry, and client

mod config;
mod errors;

pub use config::{
    Config, FacetFailurePolicy, GeminiConfig, GovernorConfig, RetryConfig, DEFAULT_GEMINI_ENDPOINT,
};
pub use errors::{Error, Result};
