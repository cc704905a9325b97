//! Resolved retry policy.
//!
//! A `RetryPolicy` is immutable for the lifetime of one invocation. Partial
//! configuration (`PolicyOverrides`) is merged over `RetryPolicy::default()`
//! at the call site; there is no process-wide mutable default.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::schema::PolicyOverrides;
use crate::config::validation::{validate_policy, ValidationError};
use crate::resilience::failure::Failure;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Caller veto: receives the failure and the 1-based attempt number that produced it.
pub type RetryPredicate = Arc<dyn Fn(&Failure, u32) -> bool + Send + Sync>;

/// Fully resolved retry policy.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first one.
    pub max_retries: u32,

    /// Delay before the second attempt (before jitter).
    pub initial_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Exponential growth rate applied per attempt.
    pub backoff_factor: f64,

    /// HTTP status codes that warrant another attempt.
    pub retryable_status_codes: BTreeSet<u16>,

    /// Optional veto consulted before the built-in classification.
    pub retry_predicate: Option<RetryPredicate>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            retry_predicate: None,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_factor", &self.backoff_factor)
            .field("retryable_status_codes", &self.retryable_status_codes)
            .field("retry_predicate", &self.retry_predicate.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl RetryPolicy {
    /// Merge `overrides` over the defaults and validate the result.
    pub fn merged(overrides: &PolicyOverrides) -> Result<Self, ConfigError> {
        let mut policy = Self::default();
        if let Some(n) = overrides.max_retries {
            policy.max_retries = n;
        }
        if let Some(ms) = overrides.initial_delay_ms {
            policy.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.max_delay_ms {
            policy.max_delay = Duration::from_millis(ms);
        }
        if let Some(factor) = overrides.backoff_factor {
            policy.backoff_factor = factor;
        }
        if let Some(codes) = &overrides.retryable_status_codes {
            policy.retryable_status_codes = codes.clone();
        }

        policy.validate().map_err(ConfigError::Validation)?;
        Ok(policy)
    }

    /// Check value ranges. Returns every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_policy(self)
    }

    /// Total attempts the invoker may make (`max_retries + 1`).
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn with_retryable_status_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    /// Install a veto predicate. Returning `false` makes the failure terminal.
    pub fn with_retry_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Failure, u32) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.total_attempts(), 4);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
        assert_eq!(policy.max_delay, Duration::from_millis(30_000));
        assert_eq!(policy.backoff_factor, 2.0);
        assert!(policy.retryable_status_codes.contains(&429));
        assert!(!policy.retryable_status_codes.contains(&404));
        assert!(policy.retry_predicate.is_none());
    }

    #[test]
    fn test_merge_keeps_unset_defaults() {
        let overrides = PolicyOverrides {
            max_retries: Some(5),
            max_delay_ms: Some(5_000),
            ..Default::default()
        };
        let policy = RetryPolicy::merged(&overrides).unwrap();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.max_delay, Duration::from_millis(5_000));
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
        assert_eq!(policy.retryable_status_codes.len(), 6);
    }

    #[test]
    fn test_merge_rejects_invalid_values() {
        let overrides = PolicyOverrides {
            initial_delay_ms: Some(2_000),
            max_delay_ms: Some(1_000),
            backoff_factor: Some(0.5),
            ..Default::default()
        };
        match RetryPolicy::merged(&overrides) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_predicate() {
        let policy = RetryPolicy::default().with_retry_predicate(|_, _| true);
        let rendered = format!("{:?}", policy);
        assert!(rendered.contains("<predicate>"));
    }
}
