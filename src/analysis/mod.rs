//! Paper analysis - facet orchestration and the result schema.
//!
//! A full analysis is four independent facets (summary, key terms, insights,
//! recommendations) issued concurrently against the same source text and
//! merged by field union into one report. The governor/invoker core below
//! this layer is schema-agnostic; the typed shape lives here.

mod prompts;
mod service;

pub use prompts::Facet;
pub use service::{AnalysisService, CompletedAnalysis};

use serde::{Deserialize, Serialize};

/// Merged analysis report. Wire names are camelCase, matching what the
/// facet prompts instruct the model to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: Summary,
    pub key_terms: Vec<KeyTerm>,
    pub insights: Vec<String>,
    pub recommendations: Recommendations,
}

/// Section-by-section summary of the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub r#abstract: String,
    pub introduction: String,
    pub methodology: String,
    pub results: String,
    pub discussion: String,
    pub conclusion: String,
}

/// A technical term with an accessible explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub explanation: String,
}

/// Recommendations block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub further_reading: Vec<ReadingEntry>,
    pub research_gaps: Vec<String>,
    pub methodology_tips: Vec<String>,
    pub future_directions: Vec<String>,
}

/// One related-paper suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingEntry {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub relevance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
