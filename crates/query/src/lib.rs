//! Intent classification, context resolution and answer synthesis.

pub mod classifier;
pub mod prompt;
pub mod resolver;
pub mod synthesizer;

pub use classifier::{is_classifiable, Classification, IntentClassifier};
pub use resolver::{select_origin, ContextBundle, ContextOrigin, ContextResolver, MIN_WEB_EVIDENCE_CHARS};
pub use synthesizer::{ResponseSynthesizer, TriageAnswer};

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

use extract::{LanguageModel, ModelError};

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("language model provider failed: {0:#}")]
    Provider(anyhow::Error),
    #[error("language model response rejected: {0}")]
    InvalidResponse(String),
}

impl From<ModelError> for TriageError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable(e) => TriageError::Provider(e),
            invalid @ ModelError::InvalidJson { .. } => TriageError::InvalidResponse(invalid.to_string()),
        }
    }
}

/// Text in, structured answer out.
pub struct TriagePipeline {
    classifier: IntentClassifier,
    resolver: ContextResolver,
    synthesizer: ResponseSynthesizer,
}

impl TriagePipeline {
    pub fn new(llm: Arc<dyn LanguageModel>, resolver: ContextResolver) -> Self {
        Self {
            classifier: IntentClassifier::new(llm.clone()),
            resolver,
            synthesizer: ResponseSynthesizer::new(llm),
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.classifier = self.classifier.with_max_retries(max_retries);
        self.synthesizer = self.synthesizer.with_max_retries(max_retries);
        self
    }

    pub fn resolver(&self) -> &ContextResolver {
        &self.resolver
    }

    pub async fn analyze(&self, text: &str) -> Result<TriageAnswer, TriageError> {
        let start = Instant::now();

        let classification = self.classifier.classify(text).await?;
        let Some(category) = classification.intent.category() else {
            return Ok(TriageAnswer::out_of_scope(&classification.issue, &classification.reason));
        };

        let bundle = self.resolver.resolve(text, classification.intent).await;
        let mut answer = self.synthesizer.synthesize(category, &bundle, text).await?;
        if answer.extracted_user_issue.is_empty() {
            answer.extracted_user_issue = classification.issue;
        }

        info!(
            intent = %answer.intent_detected,
            origin = answer.context_source.label(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Triage complete"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::rti_evidence;
    use extract::testing::ScriptedModel;
    use index::SemanticIndex;

    fn pipeline(model: Arc<ScriptedModel>) -> TriagePipeline {
        let resolver = ContextResolver::new(Arc::new(rti_evidence()), Arc::new(SemanticIndex::statutory()));
        TriagePipeline::new(model, resolver)
    }

    #[tokio::test]
    async fn test_rti_pension_scenario() {
        let model = Arc::new(ScriptedModel::new([
            r#"{"intent_detected": "RTI", "kill_switch_triggered": false,
                "extracted_user_issue": "Wants pension records through RTI", "reason": "information request"}"#,
            r#"{"simplified_explanation": "Section 6(1) lets you ask for your pension file.",
                "relevant_acts": ["Section 6(1), Right to Information Act, 2005 - request for information"],
                "immediate_action_steps": ["Write to the PIO of the pension department."],
                "extracted_user_issue": "",
                "follow_up_question": "Which office sanctioned your pension?"}"#,
        ]));

        let answer = pipeline(model.clone())
            .analyze("I want to file an RTI about my pension. My name is Ravi Kumar.")
            .await
            .unwrap();

        assert_eq!(answer.intent_detected, corpus::Intent::Rti);
        assert!(answer.extracted_user_issue.contains("pension"));
        assert_eq!(answer.context_source, ContextOrigin::WebAndSemantic);
        assert!(!answer.sources_used.is_empty());
        assert!(model.prompts()[1].contains("=== LIVE DATA FROM OFFICIAL GOVERNMENT PORTALS ==="));
    }

    #[tokio::test]
    async fn test_out_of_scope_has_no_legal_content() {
        let model = Arc::new(ScriptedModel::new([
            r#"{"intent_detected": "Unknown", "kill_switch_triggered": true,
                "extracted_user_issue": "Looking for a restaurant", "reason": "not a legal matter"}"#,
        ]));

        let answer = pipeline(model.clone())
            .analyze("What's a good restaurant nearby?")
            .await
            .unwrap();

        assert!(answer.kill_switch_triggered);
        assert!(answer.relevant_acts.is_empty());
        assert!(answer.immediate_action_steps.is_empty());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_an_error() {
        let model = Arc::new(ScriptedModel::new([
            r#"{"intent_detected": "Divorce", "kill_switch_triggered": false, "extracted_user_issue": "x"}"#,
            "not json",
            "still not json",
        ]));

        let err = pipeline(model)
            .with_max_retries(1)
            .analyze("We both want a divorce by mutual consent")
            .await
            .unwrap_err();

        assert!(matches!(err, TriageError::InvalidResponse(_)));
    }
}
