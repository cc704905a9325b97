//! Retryability classification.
//!
//! # Rules (first decisive answer wins)
//! 1. Caller predicate returns `false` → not retryable
//! 2. Network failure → retryable
//! 3. HTTP status in `retryable_status_codes` → retryable
//! 4. Timeout → retryable
//! 5. Everything else → not retryable
//!
//! The predicate can only veto. A predicate returning `true` never makes
//! an `Other` failure retryable on its own.

use crate::resilience::failure::Failure;
use crate::resilience::policy::RetryPolicy;

/// Decide whether `failure`, produced by `attempt` (1-based), warrants another attempt.
pub fn is_retryable(failure: &Failure, attempt: u32, policy: &RetryPolicy) -> bool {
    if failure.is_cancelled() {
        return false;
    }

    if let Some(predicate) = &policy.retry_predicate {
        if !predicate(failure, attempt) {
            return false;
        }
    }

    match failure {
        Failure::Network { .. } => true,
        Failure::HttpStatus { code, .. } => policy.retryable_status_codes.contains(code),
        Failure::Timeout { .. } => true,
        Failure::Cancelled | Failure::Other { .. } => false,
    }
}
