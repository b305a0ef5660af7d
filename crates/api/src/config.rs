use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub llm: LlmConfig,
    pub fetch: FetchConfig,
    pub retry: RetryConfig,
    pub sessions: SessionConfig,
    pub drafts_dir: PathBuf,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    /// Replaces the built-in portal list when set.
    pub sources_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub idle_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            llm: LlmConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
                timeout_secs: 60,
            },
            fetch: FetchConfig {
                timeout_secs: 6,
                cache_ttl_secs: 3600,
                cache_max_entries: 256,
                sources_file: None,
            },
            retry: RetryConfig {
                max_retries: 2,
                initial_backoff_ms: 500,
                max_backoff_ms: 5000,
            },
            sessions: SessionConfig { idle_secs: 1800 },
            drafts_dir: PathBuf::from("static/drafts"),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `NYAYA_*` variables, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_format = match get("NYAYA_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => return Err(anyhow!("NYAYA_LOG_FORMAT: expected 'json' or 'pretty', got '{}'", other)),
        };

        Ok(Self {
            bind_addr: get("NYAYA_BIND_ADDR").unwrap_or(defaults.bind_addr),
            llm: LlmConfig {
                base_url: get("NYAYA_LLM_URL").unwrap_or(defaults.llm.base_url),
                model: get("NYAYA_LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout_secs: parse_var(&get, "NYAYA_LLM_TIMEOUT_SECS", defaults.llm.timeout_secs)?,
            },
            fetch: FetchConfig {
                timeout_secs: parse_var(&get, "NYAYA_FETCH_TIMEOUT_SECS", defaults.fetch.timeout_secs)?,
                cache_ttl_secs: parse_var(&get, "NYAYA_PAGE_CACHE_TTL_SECS", defaults.fetch.cache_ttl_secs)?,
                cache_max_entries: parse_var(
                    &get,
                    "NYAYA_PAGE_CACHE_MAX_ENTRIES",
                    defaults.fetch.cache_max_entries,
                )?,
                sources_file: get("NYAYA_SOURCES_FILE").map(PathBuf::from),
            },
            retry: RetryConfig {
                max_retries: parse_var(&get, "NYAYA_LLM_MAX_RETRIES", defaults.retry.max_retries)?,
                ..defaults.retry
            },
            sessions: SessionConfig {
                idle_secs: parse_var(&get, "NYAYA_SESSION_IDLE_SECS", defaults.sessions.idle_secs)?,
            },
            drafts_dir: get("NYAYA_DRAFTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.drafts_dir),
            log_format,
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{}: invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
