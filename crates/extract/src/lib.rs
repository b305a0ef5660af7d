//! Structured form extraction and the form completion session.

pub mod llm;
pub mod normalizer;
pub mod prompt;
pub mod record;
pub mod retry;
pub mod schema;
pub mod session;
pub mod testing;

pub use llm::{LanguageModel, ModelError, OllamaClient};
pub use normalizer::ValueNormalizer;
pub use record::{FieldValue, FormRecord, MissingField, SchemaError};
pub use retry::RetryPolicy;
pub use schema::{FieldSchema, FieldSpec, ValueShape};
pub use session::{
    DocumentGenerator, DocumentHandle, DocumentRequest, FormCompletionSession, RequestField, SessionError,
    SessionState, SessionView,
};

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use corpus::Intent;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction provider failed: {0:#}")]
    Provider(anyhow::Error),
    #[error("extraction response rejected: {0}")]
    InvalidResponse(String),
    #[error("no form exists for intent '{0}'")]
    UnsupportedIntent(Intent),
}

impl From<ModelError> for ExtractionError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable(e) => ExtractionError::Provider(e),
            invalid @ ModelError::InvalidJson { .. } => ExtractionError::InvalidResponse(invalid.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormExtraction {
    pub record: FormRecord,
    pub missing: Vec<MissingField>,
    /// Identifier values the model produced that the user never wrote.
    pub discarded: Vec<String>,
}

pub struct FormExtractor {
    llm: Arc<dyn LanguageModel>,
    normalizer: ValueNormalizer,
    max_retries: usize,
}

impl FormExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            llm,
            normalizer: ValueNormalizer::new(),
            max_retries: 2,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fill the intent's form schema from the user's text. Only values
    /// the user stated survive; everything else stays absent.
    pub async fn extract(&self, intent: Intent, user_text: &str) -> Result<FormExtraction, ExtractionError> {
        let category = intent
            .category()
            .ok_or(ExtractionError::UnsupportedIntent(intent))?;
        let schema = FieldSchema::for_category(category);

        let prompt = prompt::build_extraction_prompt(schema, user_text);
        let response = self.llm.generate_json_with_retry(&prompt, self.max_retries).await?;

        let object = match response {
            Value::Object(map) => map,
            _ => return Err(ExtractionError::InvalidResponse("expected a JSON object".into())),
        };

        let unknown: Vec<&str> = object
            .keys()
            .filter(|k| !schema.contains(k))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(ExtractionError::InvalidResponse(format!(
                "unexpected fields: {}",
                unknown.join(", ")
            )));
        }

        let mut record = FormRecord::new(category);
        let mut discarded = Vec::new();

        for spec in schema.fields {
            let Some(raw) = object.get(spec.id) else {
                continue;
            };
            let value = FieldValue::from_json(spec, raw)
                .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
            let Some(value) = value else {
                continue;
            };

            if spec.grounded && !self.normalizer.is_grounded(&value.display(), user_text) {
                debug!(field = spec.id, "Dropping value not present in user text");
                discarded.push(spec.id.to_string());
                continue;
            }

            record
                .set(spec.id, Some(value))
                .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
        }

        let missing = record.missing();
        info!(
            intent = %intent,
            filled = record.filled(),
            missing = missing.len(),
            discarded = discarded.len(),
            "Form extraction complete"
        );

        Ok(FormExtraction {
            record,
            missing,
            discarded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    const DV_TEXT: &str = "My name is Sunita Sharma, I am 29. My husband Rakesh Sharma hits me \
        and took my salary. Last beating was on 12 March.";

    fn extractor(responses: &[&str]) -> (Arc<ScriptedModel>, FormExtractor) {
        let model = Arc::new(ScriptedModel::new(responses.iter().copied()));
        let extractor = FormExtractor::new(model.clone());
        (model, extractor)
    }

    #[tokio::test]
    async fn test_extracts_stated_values() {
        let (_, extractor) = extractor(&[r#"{
            "complainant_name": "Sunita Sharma",
            "complainant_age": "29",
            "respondent_name": "Rakesh Sharma",
            "respondent_relation": "husband",
            "nature_of_violence": ["physical", "economic"],
            "incident_date": "12 March",
            "witnesses": null,
            "children": []
        }"#]);

        let result = extractor.extract(Intent::DomesticViolence, DV_TEXT).await.unwrap();

        assert_eq!(
            result.record.get("complainant_name"),
            Some(&FieldValue::Text("Sunita Sharma".into()))
        );
        assert!(result.record.get("children").is_none());
        let missing: Vec<_> = result.missing.iter().map(|m| m.field).collect();
        assert!(missing.contains(&"witnesses"));
        assert!(missing.contains(&"complainant_phone"));
        assert!(!missing.contains(&"incident_date"));
        assert!(result.discarded.is_empty());
    }

    #[tokio::test]
    async fn test_invented_identifiers_are_discarded() {
        let (_, extractor) = extractor(&[r#"{"complainant_name": "Priya Verma", "complainant_phone": "9999999999"}"#]);

        let result = extractor.extract(Intent::DomesticViolence, DV_TEXT).await.unwrap();

        assert!(result.record.get("complainant_name").is_none());
        assert!(result.record.get("complainant_phone").is_none());
        assert_eq!(result.discarded, vec!["complainant_name", "complainant_phone"]);
        assert!(result.missing.iter().any(|m| m.field == "complainant_name"));
    }

    #[tokio::test]
    async fn test_name_and_address_only_leaves_incident_fields_absent() {
        let text = "My name is Sunita Sharma and I live at 12 MG Road, Pune.";
        let (_, extractor) = extractor(&[r#"{
            "complainant_name": "Sunita Sharma",
            "complainant_address": "12 MG Road, Pune",
            "incident_date": "5 January 2024",
            "witnesses": "Neighbour Meena Patil"
        }"#]);

        let result = extractor.extract(Intent::DomesticViolence, text).await.unwrap();

        assert!(result.record.get("incident_date").is_none());
        assert!(result.record.get("witnesses").is_none());
        assert!(result.record.get("respondent_name").is_none());
        assert_eq!(
            result.record.get("complainant_address"),
            Some(&FieldValue::Text("12 MG Road, Pune".into()))
        );
        assert_eq!(result.discarded, vec!["incident_date", "witnesses"]);

        let missing: Vec<_> = result.missing.iter().map(|m| m.field).collect();
        for field in ["incident_date", "witnesses", "respondent_name"] {
            assert!(missing.contains(&field), "{}", field);
        }
    }

    #[tokio::test]
    async fn test_unknown_keys_fail_closed() {
        let (_, extractor) = extractor(&[r#"{"complainant_name": "Sunita Sharma", "blood_group": "O+"}"#]);

        let err = extractor.extract(Intent::DomesticViolence, DV_TEXT).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidResponse(msg) if msg.contains("blood_group")));
    }

    #[tokio::test]
    async fn test_shape_mismatch_fails_closed() {
        let (_, extractor) = extractor(&[r#"{"nature_of_violence": {"kind": "physical"}}"#]);

        let err = extractor.extract(Intent::DomesticViolence, DV_TEXT).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_out_of_scope_has_no_form() {
        let (model, extractor) = extractor(&[]);

        let err = extractor.extract(Intent::OutOfScope, "anything").await.unwrap_err();

        assert!(matches!(err, ExtractionError::UnsupportedIntent(Intent::OutOfScope)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_model() {
        let extractor = FormExtractor::new(Arc::new(ScriptedModel::failing()));

        let err = extractor.extract(Intent::Rti, "I want my ration card file").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Provider(_)));
    }
}
