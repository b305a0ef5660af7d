use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use corpus::{Category, Intent};
use extract::LanguageModel;

use crate::TriageError;
use crate::prompt::build_synthesis_prompt;
use crate::resolver::{ContextBundle, ContextOrigin};

pub const WOMEN_HELPLINE: &str = "181";
pub const POLICE: &str = "100";
pub const NALSA_LEGAL_AID: &str = "15100";

/// The structured answer returned for one user statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageAnswer {
    pub intent_detected: Intent,
    pub kill_switch_triggered: bool,
    pub simplified_explanation: String,
    pub relevant_acts: Vec<String>,
    pub immediate_action_steps: Vec<String>,
    pub extracted_user_issue: String,
    pub follow_up_question: Option<String>,
    pub context_source: ContextOrigin,
    pub sources_used: Vec<String>,
}

impl TriageAnswer {
    /// Fixed reply for requests outside RTI, domestic violence and divorce.
    pub fn out_of_scope(issue: &str, reason: &str) -> Self {
        let reason = reason.trim().trim_end_matches('.');
        let why = if reason.is_empty() {
            String::new()
        } else {
            format!(" ({})", reason)
        };

        Self {
            intent_detected: Intent::OutOfScope,
            kill_switch_triggered: true,
            simplified_explanation: format!(
                "This request is outside what Nyaya can help with{}. Nyaya only gives information on \
                 RTI applications, domestic violence protection and divorce under Indian law, and does not \
                 give personal legal opinions. If you are in danger call the Women Helpline {} or Police {}. \
                 For free legal advice contact NALSA legal aid at {}.",
                why, WOMEN_HELPLINE, POLICE, NALSA_LEGAL_AID
            ),
            relevant_acts: Vec::new(),
            immediate_action_steps: Vec::new(),
            extracted_user_issue: issue.to_string(),
            follow_up_question: None,
            context_source: ContextOrigin::Skipped,
            sources_used: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct SynthesisOutput {
    simplified_explanation: String,
    relevant_acts: Vec<String>,
    immediate_action_steps: Vec<String>,
    extracted_user_issue: String,
    #[serde(default)]
    follow_up_question: Option<String>,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub struct ResponseSynthesizer {
    llm: Arc<dyn LanguageModel>,
    max_retries: usize,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm, max_retries: 2 }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub async fn synthesize(
        &self,
        category: Category,
        bundle: &ContextBundle,
        user_text: &str,
    ) -> Result<TriageAnswer, TriageError> {
        let prompt = build_synthesis_prompt(category, user_text, bundle);
        let value = self.llm.generate_json_with_retry(&prompt, self.max_retries).await?;
        let output: SynthesisOutput = serde_json::from_value(value)
            .map_err(|e| TriageError::InvalidResponse(format!("synthesis: {}", e)))?;

        let explanation = output.simplified_explanation.trim().to_string();
        if explanation.is_empty() {
            return Err(TriageError::InvalidResponse(
                "synthesis: empty explanation".to_string(),
            ));
        }

        let follow_up_question = output
            .follow_up_question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let answer = TriageAnswer {
            intent_detected: Intent::from(category),
            kill_switch_triggered: false,
            simplified_explanation: explanation,
            relevant_acts: clean_list(output.relevant_acts),
            immediate_action_steps: clean_list(output.immediate_action_steps),
            extracted_user_issue: output.extracted_user_issue.trim().to_string(),
            follow_up_question,
            context_source: bundle.origin,
            sources_used: bundle.citations.clone(),
        };

        info!(
            intent = %category,
            acts = answer.relevant_acts.len(),
            steps = answer.immediate_action_steps.len(),
            origin = bundle.origin.label(),
            "Answer synthesized"
        );
        Ok(answer)
    }
}
