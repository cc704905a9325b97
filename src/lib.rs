//! Resilient invocation: retry an async operation with jittered exponential backoff.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{InvokerConfig, PolicyOverrides};
pub use lifecycle::Shutdown;
pub use observability::{AttemptRecord, RetryObserver};
pub use resilience::{invoke_with_retry, retryable, Failure, Invoker, RetryPolicy};
