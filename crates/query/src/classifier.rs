use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use corpus::{Category, Intent};
use extract::LanguageModel;

use crate::TriageError;
use crate::prompt::build_classification_prompt;

const MIN_ALPHABETIC_WORDS: usize = 2;
const MIN_CONTENT_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub kill_switch: bool,
    pub issue: String,
    pub reason: String,
}

impl Classification {
    fn out_of_scope(issue: String, reason: String) -> Self {
        Self {
            intent: Intent::OutOfScope,
            kill_switch: true,
            issue,
            reason,
        }
    }
}

#[derive(Deserialize)]
struct ClassifierOutput {
    intent_detected: String,
    kill_switch_triggered: bool,
    #[serde(default)]
    extracted_user_issue: String,
    #[serde(default)]
    reason: String,
}

/// Too short or too empty to classify without guessing.
pub fn is_classifiable(text: &str) -> bool {
    let words = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .count();
    let content = text.chars().filter(|c| !c.is_whitespace()).count();
    words >= MIN_ALPHABETIC_WORDS && content >= MIN_CONTENT_CHARS
}

fn is_unknown_label(label: &str) -> bool {
    let key: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(key.as_str(), "unknown" | "outofscope" | "none" | "other")
}

pub struct IntentClassifier {
    llm: Arc<dyn LanguageModel>,
    max_retries: usize,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm, max_retries: 2 }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub async fn classify(&self, text: &str) -> Result<Classification, TriageError> {
        if !is_classifiable(text) {
            debug!(chars = text.len(), "Text too short to classify");
            return Ok(Classification::out_of_scope(
                text.trim().to_string(),
                "The message is too short to identify a legal issue.".to_string(),
            ));
        }

        let prompt = build_classification_prompt(text);
        let value = self.llm.generate_json_with_retry(&prompt, self.max_retries).await?;
        let output: ClassifierOutput = serde_json::from_value(value)
            .map_err(|e| TriageError::InvalidResponse(format!("classification: {}", e)))?;

        let label = output.intent_detected.trim();
        let intent = match Category::parse(label) {
            Some(category) => Intent::from(category),
            None if is_unknown_label(label) => Intent::OutOfScope,
            None => {
                return Err(TriageError::InvalidResponse(format!(
                    "classification: unrecognised intent '{}'",
                    label
                )));
            }
        };

        let classification = if output.kill_switch_triggered || !intent.is_in_scope() {
            info!(label, reason = %output.reason, "Kill switch triggered");
            Classification::out_of_scope(output.extracted_user_issue, output.reason)
        } else {
            Classification {
                intent,
                kill_switch: false,
                issue: output.extracted_user_issue,
                reason: output.reason,
            }
        };

        Ok(classification)
    }
}
