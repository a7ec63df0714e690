//! Analysis service - facet fan-out over one shared governor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future;
use serde_json::Value;

use crate::governor::AdmissionGovernor;
use crate::invoker::{AnalysisBackend, AnalysisRequest, ResilientInvoker};
use crate::types::{Config, Error, FacetFailurePolicy, Result};

use super::{AnalysisReport, Facet};

/// A finished analysis with the time it completed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAnalysis {
    pub analyzed_at: DateTime<Utc>,
    pub report: AnalysisReport,
}

/// Analysis service - issues facet calls through the admission governor and
/// resilient invoker, and merges the partial results into one report.
///
/// The governor is a single explicitly-owned instance injected here; every
/// facet of every analysis shares it, so the process as a whole respects the
/// endpoint's rate limit.
#[derive(Debug)]
pub struct AnalysisService<B> {
    governor: Arc<AdmissionGovernor>,
    invoker: ResilientInvoker<B>,
    policy: FacetFailurePolicy,
}

impl<B: AnalysisBackend> AnalysisService<B> {
    /// Create a service with its own governor instance.
    pub fn new(backend: B, config: &Config) -> Result<Self> {
        let governor = Arc::new(AdmissionGovernor::new(config.governor.clone())?);
        Ok(Self::with_governor(backend, config, governor))
    }

    /// Create a service sharing an existing governor. Use this when several
    /// services target the same rate-limited endpoint; a second governor
    /// would double the effective call rate.
    pub fn with_governor(backend: B, config: &Config, governor: Arc<AdmissionGovernor>) -> Self {
        Self {
            governor,
            invoker: ResilientInvoker::new(backend, config.retry.clone()),
            policy: config.facet_failure_policy,
        }
    }

    /// Single-facet path: wait for a slot, then run one governed invocation.
    pub async fn invoke(&self, prompt: &str, payload: &str) -> Result<Value> {
        self.governor.acquire_slot().await;
        let request = AnalysisRequest::new(prompt, payload);
        self.invoker.invoke(&request).await
    }

    /// Analyze a paper: fan out all four facets concurrently, fan in per the
    /// configured failure policy, and merge the partials by field union.
    pub async fn analyze(&self, text: &str) -> Result<CompletedAnalysis> {
        let calls = Facet::ALL.map(|facet| self.facet_call(facet, text));

        let partials = match self.policy {
            // try_join_all drops the remaining facet futures on the first
            // error, aborting their waits and in-flight calls.
            FacetFailurePolicy::FailFast => future::try_join_all(calls).await?,
            FacetFailurePolicy::CompleteAll => future::join_all(calls)
                .await
                .into_iter()
                .collect::<Result<Vec<_>>>()?,
        };

        let mut merged = serde_json::Map::new();
        for (facet, value) in partials {
            match value {
                Value::Object(fields) => merged.extend(fields),
                other => {
                    merged.insert(facet.field_name().to_string(), other);
                }
            }
        }

        let report: AnalysisReport =
            serde_json::from_value(Value::Object(merged)).map_err(Error::MalformedResponse)?;
        tracing::info!(
            chars = text.len(),
            facets = Facet::ALL.len(),
            "analysis complete"
        );

        Ok(CompletedAnalysis {
            analyzed_at: Utc::now(),
            report,
        })
    }

    async fn facet_call(&self, facet: Facet, text: &str) -> Result<(Facet, Value)> {
        let value = self.invoke(facet.prompt(), text).await?;
        tracing::debug!(facet = ?facet, "facet call finished");
        Ok((facet, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GovernorConfig;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Dispatches on the facet prompt, so each facet gets its own canned
    /// partial document; one facet can be scripted to fail.
    #[derive(Debug, Default)]
    struct FacetBackend {
        fail_key_terms: bool,
    }

    #[async_trait]
    impl AnalysisBackend for FacetBackend {
        async fn generate(&self, request: &AnalysisRequest) -> crate::types::Result<String> {
            let facet = Facet::ALL
                .into_iter()
                .find(|f| f.prompt() == request.prompt)
                .ok_or_else(|| Error::transport("unknown prompt"))?;
            match facet {
                Facet::Summary => Ok(r#"{"summary":{"abstract":"a","introduction":"i","methodology":"m","results":"r","discussion":"d","conclusion":"c"}}"#.to_string()),
                Facet::KeyTerms if self.fail_key_terms => {
                    Err(Error::transport("connection reset"))
                }
                // Fenced on purpose: the merge path must strip it too.
                Facet::KeyTerms => Ok(
                    "```json\n{\"keyTerms\":[{\"term\":\"t\",\"explanation\":\"e\"}]}\n```"
                        .to_string(),
                ),
                Facet::Insights => Ok(r#"{"insights":["one","two"]}"#.to_string()),
                Facet::Recommendations => Ok(r#"{"recommendations":{"furtherReading":[],"researchGaps":["g"],"methodologyTips":["m"],"futureDirections":["f"]}}"#.to_string()),
            }
        }
    }

    fn fast_config() -> Config {
        Config {
            governor: GovernorConfig {
                window: Duration::from_millis(1000),
                max_calls_per_window: 10,
                min_inter_call_gap: Duration::from_millis(10),
            },
            ..Config::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn analyze_merges_all_four_facets() {
        let service = AnalysisService::new(FacetBackend::default(), &fast_config()).unwrap();
        let completed = service.analyze("paper text").await.unwrap();

        let report = completed.report;
        assert_eq!(report.summary.r#abstract, "a");
        assert_eq!(report.key_terms.len(), 1);
        assert_eq!(report.insights, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(report.recommendations.research_gaps, vec!["g".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn facet_failure_surfaces_under_complete_all() {
        let config = fast_config();
        let backend = FacetBackend {
            fail_key_terms: true,
        };
        let service = AnalysisService::new(backend, &config).unwrap();
        let err = service.analyze("paper text").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn facet_failure_surfaces_under_fail_fast() {
        let config = Config {
            facet_failure_policy: FacetFailurePolicy::FailFast,
            ..fast_config()
        };
        let backend = FacetBackend {
            fail_key_terms: true,
        };
        let service = AnalysisService::new(backend, &config).unwrap();
        let err = service.analyze("paper text").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn shared_governor_counts_calls_from_both_services() {
        let config = fast_config();
        let governor = Arc::new(AdmissionGovernor::new(config.governor.clone()).unwrap());
        let a = AnalysisService::with_governor(
            FacetBackend::default(),
            &config,
            Arc::clone(&governor),
        );
        let b = AnalysisService::with_governor(
            FacetBackend::default(),
            &config,
            Arc::clone(&governor),
        );

        a.analyze("paper text").await.unwrap();
        b.analyze("paper text").await.unwrap();
        assert_eq!(governor.window_load().await, 8);
    }
}
