//! Metrics collection.
//!
//! # Metrics
//! - `invoker_attempt_failures_total` (counter): failed attempts by failure kind
//! - `invoker_retries_total` (counter): scheduled retries
//! - `invoker_backoff_delay_seconds` (histogram): computed backoff delays
//! - `invoker_outcomes_total` (counter): terminal outcomes by result
//! - `invoker_attempts_per_invocation` (histogram): attempts actually made per invocation
//!
//! Recording goes through the `metrics` facade; the embedding application
//! installs whichever recorder/exporter it wants.

use std::time::Duration;

use crate::observability::observer::{AttemptRecord, GiveUpReason, RetryObserver};

/// Record a failed attempt.
pub fn record_attempt_failure(operation: &str, kind: &'static str) {
    metrics::counter!(
        "invoker_attempt_failures_total",
        "operation" => operation.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record a scheduled retry and its delay.
pub fn record_retry(operation: &str, delay: Duration) {
    metrics::counter!("invoker_retries_total", "operation" => operation.to_string()).increment(1);
    metrics::histogram!("invoker_backoff_delay_seconds", "operation" => operation.to_string())
        .record(delay.as_secs_f64());
}

/// Record the terminal outcome of an invocation.
pub fn record_outcome(operation: &str, outcome: &'static str, attempts: u32) {
    metrics::counter!(
        "invoker_outcomes_total",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("invoker_attempts_per_invocation", "operation" => operation.to_string())
        .record(attempts as f64);
}

/// Observer that feeds the `metrics` facade.
#[derive(Debug, Clone)]
pub struct MetricsObserver {
    operation: String,
}

impl MetricsObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl RetryObserver for MetricsObserver {
    fn on_attempt_failed(&self, record: &AttemptRecord) {
        record_attempt_failure(&self.operation, record.failure_kind.unwrap_or("unknown"));
    }

    fn on_retry_scheduled(&self, record: &AttemptRecord) {
        if let Some(delay) = record.delay() {
            record_retry(&self.operation, delay);
        }
    }

    fn on_success(&self, attempt: u32, _planned_attempts: u32) {
        record_outcome(&self.operation, "succeeded", attempt);
    }

    fn on_give_up(&self, record: &AttemptRecord, reason: GiveUpReason) {
        record_outcome(&self.operation, reason.as_str(), record.attempt);
    }
}
