//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! invoke_with_retry(operation, policy)
//!     → retries.rs (attempt loop, cancellation)
//!     → On failure: classifier.rs (is this failure retryable?)
//!     → backoff.rs (jittered exponential delay)
//!     → sleep, next attempt
//! ```
//!
//! # Design Decisions
//! - Failures form a closed taxonomy (failure.rs), matched by variant only
//! - Caller predicates veto retries, they never grant them
//! - Per-attempt deadlines are opt-in (timeouts.rs)

pub mod backoff;
pub mod classifier;
pub mod failure;
pub mod policy;
pub mod retries;
pub mod timeouts;

pub use backoff::{calculate_backoff, FixedJitter, JitterSource, SeededJitter, ThreadRngJitter};
pub use classifier::is_retryable;
pub use failure::{Failure, InvokeResult};
pub use policy::{RetryPolicy, RetryPredicate};
pub use retries::{invoke_with_retry, retryable, Invoker};
pub use timeouts::with_deadline;
