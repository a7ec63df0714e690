//! # PaperLens Core - Outbound Analysis-Call Governor
//!
//! Control-flow nucleus of the PaperLens research assistant:
//! - Admission governor pacing outbound API calls (sliding window + minimum gap)
//! - Resilient invoker with bounded exponential-backoff retry
//! - Gemini `generateContent` client with response parsing and
//!   failure classification
//! - Facet fan-out: four independent analysis prompts merged into one report
//!
//! ## Architecture
//!
//! ```text
//!   analyze(text)
//!       │  fan-out (4 facets)
//!       ▼
//!   ┌──────────────────────────────────────────┐
//!   │ AnalysisService                          │
//!   │  ┌───────────┐   ┌─────────────────┐     │
//!   │  │ Admission │ → │ ResilientInvoker│ ──▶ │ → Gemini API
//!   │  │ Governor  │   │ (429 backoff)   │     │
//!   │  └───────────┘   └─────────────────┘     │
//!   └──────────────────────────────────────────┘
//!       │  fan-in (field union)
//!       ▼
//!   AnalysisReport
//! ```
//!
//! The governor instance is shared by all facets of a service; it is the only
//! shared mutable state and must not be duplicated per endpoint or the real
//! rate limit will be exceeded.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod analysis;
pub mod client;
pub mod governor;
pub mod invoker;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
