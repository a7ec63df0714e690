//! Facet prompt templates.
//!
//! Each facet asks for one top-level field of the report so the fan-in merge
//! is a plain field union. Prompts insist on bare JSON; the fence stripper
//! covers the models that wrap it anyway.

const SUMMARY_PROMPT: &str = r#"Analyze this research paper and respond with JSON only, in exactly this shape:
{
  "summary": {
    "abstract": "Brief overview of the paper",
    "introduction": "Key background and objectives",
    "methodology": "Research approach and methods used",
    "results": "Main findings",
    "discussion": "Interpretation of results",
    "conclusion": "Final takeaways and implications"
  }
}
Write clear summaries of each section, helpful for both new researchers and experts."#;

const KEY_TERMS_PROMPT: &str = r#"Extract the important technical terms from this research paper and respond with JSON only, in exactly this shape:
{
  "keyTerms": [
    { "term": "Technical term", "explanation": "Simple explanation" }
  ]
}
Give accessible explanations suitable for readers new to the field."#;

const INSIGHTS_PROMPT: &str = r#"Identify the key insights of this research paper and respond with JSON only, in exactly this shape:
{
  "insights": ["Key insight 1", "Key insight 2"]
}
Focus on what the results mean, not on restating them."#;

const RECOMMENDATIONS_PROMPT: &str = r#"Recommend follow-up work for this research paper and respond with JSON only, in exactly this shape:
{
  "recommendations": {
    "furtherReading": [
      { "title": "Related paper title", "authors": "Author names", "year": "Publication year", "relevance": "Why this paper is relevant", "link": "Optional DOI or URL" }
    ],
    "researchGaps": ["Identified research gap or opportunity"],
    "methodologyTips": ["Specific recommendation for improving or extending the methodology"],
    "futureDirections": ["Suggested direction for future research"]
  }
}
Include 3-5 further-reading entries, 2-3 research gaps, 3-4 methodology tips and 2-3 future directions."#;

/// One independent analysis facet. The four facets together produce a full
/// `AnalysisReport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Summary,
    KeyTerms,
    Insights,
    Recommendations,
}

impl Facet {
    /// All facets, in report order.
    pub const ALL: [Facet; 4] = [
        Facet::Summary,
        Facet::KeyTerms,
        Facet::Insights,
        Facet::Recommendations,
    ];

    /// Prompt template sent ahead of the paper text.
    pub fn prompt(self) -> &'static str {
        match self {
            Facet::Summary => SUMMARY_PROMPT,
            Facet::KeyTerms => KEY_TERMS_PROMPT,
            Facet::Insights => INSIGHTS_PROMPT,
            Facet::Recommendations => RECOMMENDATIONS_PROMPT,
        }
    }

    /// Top-level report field this facet fills.
    pub fn field_name(self) -> &'static str {
        match self {
            Facet::Summary => "summary",
            Facet::KeyTerms => "keyTerms",
            Facet::Insights => "insights",
            Facet::Recommendations => "recommendations",
        }
    }
}
