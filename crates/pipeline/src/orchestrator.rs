//! Question-to-validated-SQL orchestration.
//!
//! Flow: generator (if configured, under a timeout) or fallback catalog
//! produces a candidate, the candidate goes through the validation pipeline,
//! and an accepted statement is returned with an advisory cost estimate.
//! Validator rejections are terminal for the request; nothing re-prompts the
//! generator with a patched statement.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use querygate_cache::{namespaced_key, ResponseCache};
use querygate_common::config::AppConfig;
use querygate_common::models::QueryRequest;
use querygate_error::GateError;
use querygate_guard::{estimate_cost, validate_and_clean, CostEstimate, GuardPolicy};

use crate::fallback::fallback_answer;
use crate::generator::{parse_generator_response, SqlGenerator};

const ANSWER_NAMESPACE: &str = "answer";

/// A validated, bounded, read-only statement ready for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedAnswer {
    pub sql: String,
    pub explanation: String,
    pub cost: CostEstimate,
}

pub struct QueryPipeline {
    generator: Option<Arc<dyn SqlGenerator>>,
    policy: GuardPolicy,
    generation_timeout: Duration,
}

impl QueryPipeline {
    /// Fallback-only pipeline from configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            generator: None,
            policy: GuardPolicy::new(
                &config.guard.allowed_tables,
                &config.guard.forbidden_keywords,
                config.guard.max_rows,
            ),
            generation_timeout: Duration::from_secs(config.generator.timeout_secs),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn SqlGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Answer a question: candidate SQL, full validation, cost estimate.
    pub async fn answer(&self, request: &QueryRequest) -> Result<ValidatedAnswer, GateError> {
        let (candidate, explanation) = self.candidate_sql(&request.question).await;

        let sql = validate_and_clean(&candidate, &self.policy)
            .map_err(|e| e.to_gate_error(&self.policy))?;
        let cost = estimate_cost(&sql);

        tracing::info!(
            target: "pipeline",
            question = %request.question,
            tier = ?cost.tier,
            "Produced validated answer"
        );
        Ok(ValidatedAnswer {
            sql,
            explanation,
            cost,
        })
    }

    /// Cache read-through over [`Self::answer`], keyed by request fingerprint.
    /// Only accepted answers are cached; rejections are recomputed each time
    /// so a policy change takes effect immediately.
    pub async fn answer_cached(
        &self,
        request: &QueryRequest,
        cache: &ResponseCache,
    ) -> Result<ValidatedAnswer, GateError> {
        // Cache trouble never blocks an answer; an unfingerprintable request
        // just runs uncached.
        let key = match serde_json::to_value(request) {
            Ok(value) => namespaced_key(ANSWER_NAMESPACE, &value),
            Err(e) => {
                tracing::warn!(target: "pipeline", error = %e, "Request fingerprinting failed, bypassing cache");
                return self.answer(request).await;
            }
        };

        if let Some(payload) = cache.get(&key).await {
            match serde_json::from_value::<ValidatedAnswer>(payload) {
                Ok(answer) => return Ok(answer),
                // Entry written by an older payload shape; recompute.
                Err(e) => {
                    tracing::warn!(target: "pipeline", key, error = %e, "Discarding undecodable cache entry");
                    cache.invalidate(&key).await;
                }
            }
        }

        let answer = self.answer(request).await?;
        match serde_json::to_value(&answer) {
            Ok(payload) => cache.put(&key, payload).await,
            Err(e) => {
                tracing::warn!(target: "pipeline", key, error = %e, "Skipping cache write")
            }
        }
        Ok(answer)
    }

    /// Produce candidate SQL and its explanation. Any generator trouble
    /// (backend error, unparseable response, timeout) falls back to the
    /// template catalog; this path never fails.
    async fn candidate_sql(&self, question: &str) -> (String, String) {
        if let Some(generator) = &self.generator {
            match tokio::time::timeout(self.generation_timeout, generator.generate(question)).await
            {
                Ok(Ok(content)) => match parse_generator_response(&content) {
                    Ok(generated) => {
                        return (generated.sql, generated.explanation.unwrap_or_default())
                    }
                    Err(e) => {
                        tracing::warn!(target: "pipeline", error = %e, "Unusable generator response, using fallback")
                    }
                },
                Ok(Err(e)) => {
                    tracing::warn!(target: "pipeline", error = %e, "Generator failed, using fallback")
                }
                Err(_) => {
                    tracing::warn!(
                        target: "pipeline",
                        timeout_secs = self.generation_timeout.as_secs(),
                        "Generator timed out, using fallback"
                    )
                }
            }
        }

        let fallback = fallback_answer(question);
        (fallback.sql, fallback.explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_policy_follows_config() {
        let mut config = AppConfig::default();
        config.guard.max_rows = 42;
        let pipeline = QueryPipeline::new(&config);
        assert_eq!(pipeline.policy.max_rows, 42);
    }
}
