use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use corpus::Category;

use crate::record::{FieldValue, FormRecord, MissingField, SchemaError};
use crate::{ExtractionError, FormExtractor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Extracting,
    AwaitingInput,
    Generating,
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Extracting => "extracting",
            SessionState::AwaitingInput => "awaiting input",
            SessionState::Generating => "generating",
            SessionState::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} while the form is {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("document generation failed: {0}")]
    Generation(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// `None` serializes as `null` and marks an absent value.
    pub value: Option<FieldValue>,
}

/// Everything a document generator needs: every schema field, in order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRequest {
    pub intent: Category,
    pub title: &'static str,
    pub fields: Vec<RequestField>,
}

impl DocumentRequest {
    pub fn from_record(record: &FormRecord) -> Self {
        Self {
            intent: record.category(),
            title: record.schema().title,
            fields: record
                .entries()
                .map(|(spec, value)| RequestField {
                    name: spec.id,
                    label: spec.label,
                    required: spec.required,
                    value: value.cloned(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub document_id: String,
    pub location: String,
}

/// Renders a finished form into a downloadable document.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, request: &DocumentRequest) -> anyhow::Result<DocumentHandle>;
}

/// Drives one user's form from extraction to a generated document.
///
/// `Extracting -> AwaitingInput -> Generating -> Complete`, and
/// `Complete -> AwaitingInput` on edit. Field updates are accepted only
/// while awaiting input. Generation may start with required fields still
/// missing; the document shows them as blanks.
#[derive(Debug)]
pub struct FormCompletionSession {
    id: Uuid,
    record: FormRecord,
    state: SessionState,
    document: Option<DocumentHandle>,
    last_error: Option<String>,
    touched: Instant,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub intent: Category,
    pub state: SessionState,
    pub form_data: Value,
    pub missing_fields: Vec<&'static str>,
    /// Index-aligned with `missing_fields`.
    pub missing_questions: Vec<&'static str>,
    pub document: Option<DocumentHandle>,
    pub last_error: Option<String>,
}

impl FormCompletionSession {
    /// Run extraction and open the session for user input.
    pub async fn start(
        extractor: &FormExtractor,
        intent: corpus::Intent,
        user_text: &str,
    ) -> Result<Self, ExtractionError> {
        let category = intent
            .category()
            .ok_or(ExtractionError::UnsupportedIntent(intent))?;

        let mut session = Self::extracting(category);
        let extraction = extractor.extract(intent, user_text).await?;
        session.record = extraction.record;
        session.state = SessionState::AwaitingInput;

        info!(
            session_id = %session.id,
            intent = %intent,
            missing = session.record.missing().len(),
            "Form session started"
        );
        Ok(session)
    }

    fn extracting(category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            record: FormRecord::new(category),
            state: SessionState::Extracting,
            document: None,
            last_error: None,
            touched: Instant::now(),
        }
    }

    /// Open a session over a record that was filled elsewhere.
    pub fn from_record(record: FormRecord) -> Self {
        let mut session = Self::extracting(record.category());
        session.record = record;
        session.state = SessionState::AwaitingInput;
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn missing(&self) -> Vec<MissingField> {
        self.record.missing()
    }

    pub fn idle_for(&self) -> Duration {
        self.touched.elapsed()
    }

    fn require(&self, action: &'static str, state: SessionState) -> Result<(), SessionError> {
        if self.state == state {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    /// Fails unless the session currently accepts field updates.
    pub fn ensure_editable(&self) -> Result<(), SessionError> {
        self.require("update a field", SessionState::AwaitingInput)
    }

    pub fn update_field(&mut self, field: &str, value: Option<FieldValue>) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.record.set(field, value)?;
        self.touched = Instant::now();
        Ok(())
    }

    pub fn update_field_json(&mut self, field: &str, value: &Value) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.record.set_json(field, value)?;
        self.touched = Instant::now();
        Ok(())
    }

    /// Move to `Generating` and snapshot the record for the generator.
    pub fn begin_generation(&mut self) -> Result<DocumentRequest, SessionError> {
        self.require("generate a document", SessionState::AwaitingInput)?;
        self.state = SessionState::Generating;
        self.last_error = None;
        self.touched = Instant::now();
        Ok(DocumentRequest::from_record(&self.record))
    }

    /// Record the generator's outcome. Failure returns the session to
    /// `AwaitingInput` with no document.
    pub fn finish_generation(
        &mut self,
        outcome: anyhow::Result<DocumentHandle>,
    ) -> Result<DocumentHandle, SessionError> {
        self.require("finish generation", SessionState::Generating)?;
        self.touched = Instant::now();

        match outcome {
            Ok(handle) => {
                info!(session_id = %self.id, document_id = %handle.document_id, "Form document generated");
                self.state = SessionState::Complete;
                self.document = Some(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Form document generation failed");
                self.state = SessionState::AwaitingInput;
                self.document = None;
                self.last_error = Some(format!("{:#}", e));
                Err(SessionError::Generation(format!("{:#}", e)))
            }
        }
    }

    /// Run the generator. If this future is dropped mid-generation the
    /// session falls back to `AwaitingInput`.
    pub async fn generate(&mut self, generator: &dyn DocumentGenerator) -> Result<DocumentHandle, SessionError> {
        let request = self.begin_generation()?;
        let mut guard = GenerationGuard(Some(self));
        let outcome = generator.generate(&request).await;

        match guard.0.take() {
            Some(session) => session.finish_generation(outcome),
            None => Err(SessionError::Generation("generation already finished".into())),
        }
    }

    fn abandon_generation(&mut self) {
        if self.state != SessionState::Generating {
            return;
        }
        warn!(session_id = %self.id, "Form document generation interrupted");
        self.state = SessionState::AwaitingInput;
        self.document = None;
        self.last_error = Some("document generation was interrupted".to_string());
        self.touched = Instant::now();
    }

    /// Reopen a completed form. Values are kept; the old document is
    /// no longer current.
    pub fn edit(&mut self) -> Result<(), SessionError> {
        self.require("edit", SessionState::Complete)?;
        self.state = SessionState::AwaitingInput;
        self.document = None;
        self.touched = Instant::now();
        Ok(())
    }

    pub fn view(&self) -> SessionView {
        let missing = self.missing();
        SessionView {
            session_id: self.id,
            intent: self.record.category(),
            state: self.state,
            form_data: self.record.to_json(),
            missing_fields: missing.iter().map(|m| m.field).collect(),
            missing_questions: missing.iter().map(|m| m.question).collect(),
            document: self.document.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Holds the session while the generator runs; dropping it still armed
/// means the generation future was cancelled.
struct GenerationGuard<'a>(Option<&'a mut FormCompletionSession>);

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.0.take() {
            session.abandon_generation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use corpus::Intent;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingGenerator {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl DocumentGenerator for CountingGenerator {
        async fn generate(&self, request: &DocumentRequest) -> anyhow::Result<DocumentHandle> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("disk full");
            }
            Ok(DocumentHandle {
                document_id: format!("doc-{}", n),
                location: format!("/drafts/{}-{}.txt", request.intent.label(), n),
            })
        }
    }

    fn rti_session() -> FormCompletionSession {
        let mut record = FormRecord::new(Category::Rti);
        record.set_json("name", &json!("Asha Devi")).unwrap();
        FormCompletionSession::from_record(record)
    }

    #[tokio::test]
    async fn test_start_runs_extraction() {
        let model = Arc::new(ScriptedModel::new([r#"{"name": "Asha Devi", "address": null}"#]));
        let extractor = FormExtractor::new(model);

        let session = FormCompletionSession::start(&extractor, Intent::Rti, "I am Asha Devi from Jaipur.")
            .await
            .unwrap();

        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert_eq!(session.missing()[0].field, "address");
        assert!(session.document().is_none());
    }

    #[tokio::test]
    async fn test_generate_then_edit_then_regenerate() {
        let generator = CountingGenerator::new(false);
        let mut session = rti_session();

        let first = session.generate(&generator).await.unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.document(), Some(&first));

        assert!(matches!(
            session.update_field_json("address", &json!("Jaipur")),
            Err(SessionError::InvalidState { .. })
        ));

        assert!(session.ensure_editable().is_err());

        session.edit().unwrap();
        assert!(session.ensure_editable().is_ok());
        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert!(session.document().is_none());

        session.update_field_json("address", &json!("12 MI Road, Jaipur")).unwrap();
        let second = session.generate(&generator).await.unwrap();

        assert_ne!(first.document_id, second.document_id);
        assert_eq!(
            session.record().get("address"),
            Some(&FieldValue::Text("12 MI Road, Jaipur".into()))
        );
        assert_eq!(
            session.record().get("name"),
            Some(&FieldValue::Text("Asha Devi".into()))
        );
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_awaiting_input() {
        let generator = CountingGenerator::new(true);
        let mut session = rti_session();

        let err = session.generate(&generator).await.unwrap_err();

        assert!(matches!(err, SessionError::Generation(ref msg) if msg.contains("disk full")));
        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert!(session.document().is_none());
        assert_eq!(session.last_error(), Some("disk full"));
        session.update_field_json("address", &json!("Jaipur")).unwrap();
    }

    struct StalledGenerator;

    #[async_trait]
    impl DocumentGenerator for StalledGenerator {
        async fn generate(&self, _request: &DocumentRequest) -> anyhow::Result<DocumentHandle> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancelled_generation_reopens_the_form() {
        let mut session = rti_session();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), session.generate(&StalledGenerator)).await;
        assert!(cancelled.is_err());

        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert!(session.document().is_none());
        assert_eq!(session.last_error(), Some("document generation was interrupted"));

        session.update_field_json("address", &json!("Jaipur")).unwrap();
        let generator = CountingGenerator::new(false);
        session.generate(&generator).await.unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_repeated_updates_keep_latest_value() {
        let mut session = rti_session();
        let missing_fields = |s: &FormCompletionSession| s.missing().iter().map(|m| m.field).collect::<Vec<_>>();
        let before = missing_fields(&session);
        assert!(before.contains(&"department_name"));

        session.update_field_json("department_name", &json!("A")).unwrap();
        assert_eq!(session.record().get("department_name"), Some(&FieldValue::Text("A".into())));
        let after_first = missing_fields(&session);
        assert!(!after_first.contains(&"department_name"));

        session.update_field_json("department_name", &json!("B")).unwrap();
        assert_eq!(session.record().get("department_name"), Some(&FieldValue::Text("B".into())));
        assert_eq!(missing_fields(&session), after_first);
        assert_eq!(session.record().filled(), 2);

        session.update_field_json("department_name", &Value::Null).unwrap();
        assert!(session.record().get("department_name").is_none());
        assert_eq!(missing_fields(&session), before);
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }

    #[tokio::test]
    async fn test_request_includes_absent_fields() {
        let mut session = rti_session();
        let request = session.begin_generation().unwrap();

        assert_eq!(request.fields.len(), session.record().schema().fields.len());
        let email = request.fields.iter().find(|f| f.name == "email").unwrap();
        assert!(email.value.is_none());
        assert_eq!(serde_json::to_value(email).unwrap()["value"], Value::Null);

        assert!(matches!(
            session.begin_generation(),
            Err(SessionError::InvalidState { state: SessionState::Generating, .. })
        ));
    }

    #[test]
    fn test_edit_requires_complete() {
        let mut session = rti_session();
        assert!(matches!(session.edit(), Err(SessionError::InvalidState { .. })));
    }

    #[test]
    fn test_schema_errors_surface() {
        let mut session = rti_session();
        assert!(matches!(
            session.update_field("spouse_name", Some(FieldValue::Text("x".into()))),
            Err(SessionError::Schema(SchemaError::UnknownField { .. }))
        ));
    }
}
