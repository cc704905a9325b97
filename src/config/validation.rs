//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, factor >= 1, status codes in 100..=599)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RetryPolicy → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::resilience::policy::RetryPolicy;

/// A single semantic violation in a retry policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("initial_delay must be greater than zero")]
    ZeroInitialDelay,

    #[error("max_delay ({max_ms} ms) must be at least initial_delay ({initial_ms} ms)")]
    MaxDelayBelowInitial { initial_ms: u128, max_ms: u128 },

    #[error("backoff_factor must be a finite number >= 1 (got {0})")]
    InvalidBackoffFactor(f64),

    #[error("retryable status code {0} is not a valid HTTP status")]
    InvalidStatusCode(u16),
}

/// Check a resolved policy.
pub fn validate_policy(policy: &RetryPolicy) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if policy.initial_delay.is_zero() {
        errors.push(ValidationError::ZeroInitialDelay);
    }

    if policy.max_delay < policy.initial_delay {
        errors.push(ValidationError::MaxDelayBelowInitial {
            initial_ms: policy.initial_delay.as_millis(),
            max_ms: policy.max_delay.as_millis(),
        });
    }

    if !policy.backoff_factor.is_finite() || policy.backoff_factor < 1.0 {
        errors.push(ValidationError::InvalidBackoffFactor(policy.backoff_factor));
    }

    for &code in &policy.retryable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatusCode(code));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
