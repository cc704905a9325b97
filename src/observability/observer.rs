//! Observer hook for invocation progress.
//!
//! # Responsibilities
//! - Report each failed attempt, each scheduled retry and the final outcome
//! - Keep the invoker itself silent unless an observer is installed
//!
//! # Events
//! - `on_attempt_failed`: every failed attempt, retryable or not
//! - `on_retry_scheduled`: right before the backoff sleep
//! - `on_success`: operation produced a value
//! - `on_give_up`: terminal failure, with the reason

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::resilience::failure::Failure;

/// Snapshot of one attempt. Only lives for the duration of the observer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// 1-based attempt number.
    pub attempt: u32,
    /// `max_retries + 1`.
    pub planned_attempts: u32,
    /// Failure category (`network`, `http_status`, ...).
    pub failure_kind: Option<&'static str>,
    /// HTTP status, for `http_status` failures.
    pub status: Option<u16>,
    /// Human-readable failure summary.
    pub failure: Option<String>,
    /// Delay before the next attempt, once computed.
    pub delay_ms: Option<u64>,
}

impl AttemptRecord {
    pub fn failed(attempt: u32, planned_attempts: u32, failure: &Failure) -> Self {
        Self {
            attempt,
            planned_attempts,
            failure_kind: Some(failure.kind()),
            status: failure.status_code(),
            failure: Some(failure.summary()),
            delay_ms: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis() as u64);
        self
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }
}

/// Why the invoker stopped without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveUpReason {
    /// Retry budget consumed.
    Exhausted,
    /// Failure classified as not retryable.
    NonRetryable,
    /// Caller cancelled.
    Cancelled,
}

impl GiveUpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::NonRetryable => "non_retryable",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GiveUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pluggable sink for invocation progress. All methods default to no-ops.
pub trait RetryObserver: Send + Sync {
    fn on_attempt_failed(&self, _record: &AttemptRecord) {}

    fn on_retry_scheduled(&self, _record: &AttemptRecord) {}

    fn on_success(&self, _attempt: u32, _planned_attempts: u32) {}

    fn on_give_up(&self, _record: &AttemptRecord, _reason: GiveUpReason) {}
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {}

/// Emits structured `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("operation")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_failed(&self, record: &AttemptRecord) {
        tracing::warn!(
            operation = %self.operation,
            attempt = record.attempt,
            planned = record.planned_attempts,
            kind = record.failure_kind.unwrap_or("unknown"),
            status = ?record.status,
            error = record.failure.as_deref().unwrap_or(""),
            "Attempt failed"
        );
    }

    fn on_retry_scheduled(&self, record: &AttemptRecord) {
        tracing::info!(
            operation = %self.operation,
            attempt = record.attempt,
            planned = record.planned_attempts,
            delay = ?record.delay(),
            "Retrying operation"
        );
    }

    fn on_success(&self, attempt: u32, planned_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt,
            planned = planned_attempts,
            "Operation succeeded"
        );
    }

    fn on_give_up(&self, record: &AttemptRecord, reason: GiveUpReason) {
        tracing::error!(
            operation = %self.operation,
            attempt = record.attempt,
            planned = record.planned_attempts,
            reason = %reason,
            error = record.failure.as_deref().unwrap_or(""),
            "Giving up"
        );
    }
}

/// Terminal outcome captured by `RecordingObserver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordedOutcome {
    Succeeded { attempt: u32 },
    GaveUp { attempt: u32, reason: GiveUpReason },
}

/// Everything a `RecordingObserver` has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationReport {
    pub failed_attempts: Vec<AttemptRecord>,
    pub scheduled_retries: Vec<AttemptRecord>,
    pub outcome: Option<RecordedOutcome>,
}

/// Collects records in memory, for tests and JSON reports.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    report: Mutex<InvocationReport>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn report(&self) -> InvocationReport {
        self.lock().clone()
    }

    /// Delays of every scheduled retry, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.lock()
            .scheduled_retries
            .iter()
            .filter_map(AttemptRecord::delay)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InvocationReport> {
        self.report.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RetryObserver for RecordingObserver {
    fn on_attempt_failed(&self, record: &AttemptRecord) {
        self.lock().failed_attempts.push(record.clone());
    }

    fn on_retry_scheduled(&self, record: &AttemptRecord) {
        self.lock().scheduled_retries.push(record.clone());
    }

    fn on_success(&self, attempt: u32, _planned_attempts: u32) {
        self.lock().outcome = Some(RecordedOutcome::Succeeded { attempt });
    }

    fn on_give_up(&self, record: &AttemptRecord, reason: GiveUpReason) {
        self.lock().outcome = Some(RecordedOutcome::GaveUp {
            attempt: record.attempt,
            reason,
        });
    }
}

/// Fans every event out to several observers.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RetryObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RetryObserver for CompositeObserver {
    fn on_attempt_failed(&self, record: &AttemptRecord) {
        for o in &self.observers {
            o.on_attempt_failed(record);
        }
    }

    fn on_retry_scheduled(&self, record: &AttemptRecord) {
        for o in &self.observers {
            o.on_retry_scheduled(record);
        }
    }

    fn on_success(&self, attempt: u32, planned_attempts: u32) {
        for o in &self.observers {
            o.on_success(attempt, planned_attempts);
        }
    }

    fn on_give_up(&self, record: &AttemptRecord, reason: GiveUpReason) {
        for o in &self.observers {
            o.on_give_up(record, reason);
        }
    }
}
