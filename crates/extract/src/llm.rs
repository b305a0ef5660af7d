use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prompt::build_retry_prompt;
use crate::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("language model unavailable: {0:#}")]
    Unavailable(anyhow::Error),
    #[error("language model returned invalid JSON after {attempts} attempts")]
    InvalidJson { attempts: usize },
}

/// A text-generation backend that is asked for JSON objects.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate, then ask the model to repair its own output up to
    /// `max_retries` times. Never returns anything but a JSON object.
    async fn generate_json_with_retry(
        &self,
        prompt: &str,
        max_retries: usize,
    ) -> Result<Value, ModelError> {
        let mut response = self.generate(prompt).await.map_err(ModelError::Unavailable)?;

        for attempt in 0..=max_retries {
            if let Some(value) = parse_json_object(&response) {
                return Ok(value);
            }
            if attempt == max_retries {
                break;
            }

            warn!(attempt = attempt + 1, max_retries, "Model returned invalid JSON, asking for a correction");
            response = self
                .generate(&build_retry_prompt(&response))
                .await
                .map_err(ModelError::Unavailable)?;
        }

        Err(ModelError::InvalidJson {
            attempts: max_retries + 1,
        })
    }
}

/// Parse a model response as a JSON object, tolerating a surrounding
/// markdown code fence.
pub fn parse_json_object(raw: &str) -> Option<Value> {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches("json").trim();
        body = body.strip_suffix("```").unwrap_or(body).trim();
    }

    serde_json::from_str::<Value>(body)
        .ok()
        .filter(Value::is_object)
}

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str, // "json" for structured output
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama request failed: {}", response.status());
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        debug!(model = %self.model, chars = ollama_response.response.len(), "Ollama response received");
        Ok(ollama_response.response)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new("http://localhost:11434".to_string(), "llama3".to_string())
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.retry.retry("ollama_generate", || self.request(prompt)).await
    }
}
