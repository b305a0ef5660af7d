use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use corpus::Intent;

use crate::test_set::LabelledUtterance;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub total_queries: usize,
    pub failed_queries: usize,
    pub intent_accuracy: f64,
    pub kill_switch_accuracy: f64,
    /// Answers per `context_source` label (WEB+RAG, RAG, NONE).
    pub context_origins: BTreeMap<String, usize>,
    pub avg_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub by_intent: Vec<IntentScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    pub accuracy: f64,
    pub count: usize,
}

/// The subset of an `/api/analyze` reply the benchmark scores.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeReply {
    pub intent_detected: Intent,
    pub kill_switch_triggered: bool,
    pub context_source: String,
}

/// One scored utterance. `reply` is `None` when the request failed.
#[derive(Debug, Clone)]
pub struct Observation {
    pub expected: LabelledUtterance,
    pub reply: Option<AnalyzeReply>,
    pub latency_ms: f64,
}

pub struct Benchmarker {
    client: reqwest::Client,
    api_base_url: String,
}

impl Benchmarker {
    pub fn new(api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url,
        }
    }

    pub async fn run_benchmark(&self, test_set: &[LabelledUtterance]) -> Result<BenchmarkResults> {
        println!("Running benchmark with {} utterances...", test_set.len());

        let mut observations = Vec::with_capacity(test_set.len());
        for utterance in test_set {
            let start = Instant::now();
            let reply = match self.analyze(&utterance.text).await {
                Ok(reply) => Some(reply),
                Err(e) => {
                    println!("  ✗ {:?}: {:#}", utterance.text, e);
                    None
                }
            };
            observations.push(Observation {
                expected: utterance.clone(),
                reply,
                latency_ms: start.elapsed().as_millis() as f64,
            });
        }

        Ok(compute_results(&observations))
    }

    async fn analyze(&self, text: &str) -> Result<AnalyzeReply> {
        let response = self
            .client
            .post(format!("{}/api/analyze", self.api_base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .context("Failed to reach the triage API")?
            .error_for_status()?;

        response.json().await.context("Unexpected analyze response")
    }
}

pub fn compute_results(observations: &[Observation]) -> BenchmarkResults {
    let mut latencies: Vec<f64> = observations.iter().map(|o| o.latency_ms).collect();
    latencies.sort_by(|a, b| a.total_cmp(b));

    let mut context_origins = BTreeMap::new();
    let mut intent_hits = 0;
    let mut kill_switch_hits = 0;
    let mut per_intent: BTreeMap<&'static str, (usize, usize)> = BTreeMap::new();

    for observation in observations {
        let expected = &observation.expected;
        let intent_hit = observation
            .reply
            .as_ref()
            .is_some_and(|r| r.intent_detected == expected.expected_intent);

        if let Some(reply) = &observation.reply {
            *context_origins.entry(reply.context_source.clone()).or_insert(0) += 1;
            if reply.kill_switch_triggered == expected.expected_kill_switch {
                kill_switch_hits += 1;
            }
        }
        if intent_hit {
            intent_hits += 1;
        }

        let entry = per_intent.entry(expected.expected_intent.label()).or_insert((0, 0));
        entry.1 += 1;
        if intent_hit {
            entry.0 += 1;
        }
    }

    let total = observations.len();
    let by_intent = per_intent
        .into_iter()
        .map(|(intent, (hits, count))| IntentScore {
            intent: intent.to_string(),
            accuracy: ratio(hits, count),
            count,
        })
        .collect();

    BenchmarkResults {
        total_queries: total,
        failed_queries: observations.iter().filter(|o| o.reply.is_none()).count(),
        intent_accuracy: ratio(intent_hits, total),
        kill_switch_accuracy: ratio(kill_switch_hits, total),
        context_origins,
        avg_latency_ms: if latencies.is_empty() { 0.0 } else { statistical::mean(&latencies) },
        p50_latency_ms: if latencies.is_empty() { 0.0 } else { statistical::median(&latencies) },
        p95_latency_ms: percentile(&latencies, 95),
        by_intent,
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn percentile(sorted_data: &[f64], p: usize) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let index = (p as f64 / 100.0 * sorted_data.len() as f64) as usize;
    sorted_data[index.min(sorted_data.len() - 1)]
}
