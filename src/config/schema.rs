//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! retry field is optional; unset fields fall back to `RetryPolicy::default()`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::resilience::policy::RetryPolicy;

/// Root configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct InvokerConfig {
    /// Retry policy overrides.
    pub retry: PolicyOverrides,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Partial retry policy, merged over the defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PolicyOverrides {
    /// Additional attempts after the first.
    pub max_retries: Option<u32>,

    /// Initial backoff delay in milliseconds.
    pub initial_delay_ms: Option<u64>,

    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: Option<u64>,

    /// Exponential growth rate (>= 1).
    pub backoff_factor: Option<f64>,

    /// HTTP status codes that are retried.
    pub retryable_status_codes: Option<BTreeSet<u16>>,
}

impl PolicyOverrides {
    /// Merge over the defaults and validate.
    pub fn resolve(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::merged(self)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn overlay(mut self, other: &PolicyOverrides) -> Self {
        if other.max_retries.is_some() {
            self.max_retries = other.max_retries;
        }
        if other.initial_delay_ms.is_some() {
            self.initial_delay_ms = other.initial_delay_ms;
        }
        if other.max_delay_ms.is_some() {
            self.max_delay_ms = other.max_delay_ms;
        }
        if other.backoff_factor.is_some() {
            self.backoff_factor = other.backoff_factor;
        }
        if other.retryable_status_codes.is_some() {
            self.retryable_status_codes = other.retryable_status_codes.clone();
        }
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit a `tracing` event per attempt.
    pub trace_attempts: bool,

    /// Feed attempt counters to the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_attempts: true,
            metrics_enabled: false,
        }
    }
}
