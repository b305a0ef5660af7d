use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use query::{ContextOrigin, TriageAnswer};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Triage outcomes
    kill_switches: AtomicUsize,
    web_resolutions: AtomicUsize,
    semantic_resolutions: AtomicUsize,

    // Forms
    forms_started: AtomicUsize,
    documents_generated: AtomicUsize,
    generation_failures: AtomicUsize,

    // Timing (in microseconds)
    total_analyze_time_us: AtomicU64,
    analyze_count: AtomicUsize,
    total_extract_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            kill_switches: AtomicUsize::new(0),
            web_resolutions: AtomicUsize::new(0),
            semantic_resolutions: AtomicUsize::new(0),
            forms_started: AtomicUsize::new(0),
            documents_generated: AtomicUsize::new(0),
            generation_failures: AtomicUsize::new(0),
            total_analyze_time_us: AtomicU64::new(0),
            analyze_count: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_analyze(&self, duration: Duration, answer: &TriageAnswer) {
        self.total_analyze_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.analyze_count.fetch_add(1, Ordering::Relaxed);

        if answer.kill_switch_triggered {
            self.kill_switches.fetch_add(1, Ordering::Relaxed);
        }
        match answer.context_source {
            ContextOrigin::WebAndSemantic => self.web_resolutions.fetch_add(1, Ordering::Relaxed),
            ContextOrigin::SemanticOnly => self.semantic_resolutions.fetch_add(1, Ordering::Relaxed),
            ContextOrigin::Skipped => 0,
        };
    }

    pub fn record_form_started(&self, duration: Duration) {
        self.total_extract_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.forms_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation(&self, success: bool) {
        if success {
            self.documents_generated.fetch_add(1, Ordering::Relaxed);
        } else {
            self.generation_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            kill_switches: self.kill_switches.load(Ordering::Relaxed),
            web_resolutions: self.web_resolutions.load(Ordering::Relaxed),
            semantic_resolutions: self.semantic_resolutions.load(Ordering::Relaxed),
            forms_started: self.forms_started.load(Ordering::Relaxed),
            documents_generated: self.documents_generated.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
            avg_analyze_time_ms: self.avg_time_ms(&self.total_analyze_time_us, &self.analyze_count),
            avg_extract_time_ms: self.avg_time_ms(&self.total_extract_time_us, &self.forms_started),
        }
    }

    fn avg_time_ms(&self, total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
        let total = total_us.load(Ordering::Relaxed) as f64;
        let cnt = count.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub kill_switches: usize,
    pub web_resolutions: usize,
    pub semantic_resolutions: usize,
    pub forms_started: usize,
    pub documents_generated: usize,
    pub generation_failures: usize,
    pub avg_analyze_time_ms: f64,
    pub avg_extract_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
