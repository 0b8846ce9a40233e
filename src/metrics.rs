//! Dispatch metrics.
//!
//! Each [`crate::dispatch::Dispatcher`] owns one [`DispatchMetrics`]; there
//! is no process-wide instance.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Requests that reached a translator
    requests: AtomicUsize,

    /// Requests rejected by validation
    rejected: AtomicUsize,

    /// Calls made to the language detector
    detections: AtomicUsize,

    /// Detector calls that failed and were degraded
    detection_failures: AtomicUsize,

    /// Calls made to the text generator
    generator_calls: AtomicUsize,

    /// Generator calls that failed or returned blank text
    generator_failures: AtomicUsize,

    /// Translations served by a rule-based engine
    rule_based: AtomicUsize,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_failure(&self) {
        self.detection_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generator_call(&self) {
        self.generator_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generator_failure(&self) {
        self.generator_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rule_based(&self) {
        self.rule_based.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn detections(&self) -> usize {
        self.detections.load(Ordering::Relaxed)
    }

    pub fn detection_failures(&self) -> usize {
        self.detection_failures.load(Ordering::Relaxed)
    }

    pub fn generator_calls(&self) -> usize {
        self.generator_calls.load(Ordering::Relaxed)
    }

    pub fn generator_failures(&self) -> usize {
        self.generator_failures.load(Ordering::Relaxed)
    }

    pub fn rule_based(&self) -> usize {
        self.rule_based.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let detections = self.detections();
        let detection_failures = self.detection_failures();
        let calls = self.generator_calls();
        let failures = self.generator_failures();

        MetricsReport {
            requests: self.requests(),
            rejected: self.rejected(),
            detections,
            detection_failures,
            detection_success_rate: success_rate(detections, detection_failures),
            generator_calls: calls,
            generator_failures: failures,
            generator_success_rate: success_rate(calls, failures),
            rule_based: self.rule_based(),
        }
    }
}

/// Percentage of `total` that did not fail; 0 when nothing happened.
fn success_rate(total: usize, failures: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total.saturating_sub(failures) as f64 / total as f64) * 100.0
}

/// Snapshot of dispatch counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub requests: usize,
    pub rejected: usize,
    pub detections: usize,
    pub detection_failures: usize,
    /// Detection success rate as a percentage (0-100)
    pub detection_success_rate: f64,
    pub generator_calls: usize,
    pub generator_failures: usize,
    /// Generator success rate as a percentage (0-100)
    pub generator_success_rate: f64,
    pub rule_based: usize,
}
