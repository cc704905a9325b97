//! Retry logic.
//!
//! # Responsibilities
//! - Run an operation until it succeeds, exhausts its budget or fails terminally
//! - Sleep a jittered exponential backoff between attempts
//! - Stop scheduling attempts once the caller's cancellation token fires
//!
//! # State Transitions
//! ```text
//! ATTEMPTING → SUCCEEDED:           operation returned a value
//! ATTEMPTING → EVALUATING_FAILURE:  operation failed
//! EVALUATING_FAILURE → FAILED:      cancelled, budget spent, or not retryable
//! EVALUATING_FAILURE → ATTEMPTING:  after the backoff delay
//! ```
//!
//! The terminal error is always the most recent failure. Earlier failures
//! are only visible through the observer.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::observability::observer::{AttemptRecord, GiveUpReason, NoopObserver, RetryObserver};
use crate::resilience::backoff::{calculate_backoff, JitterSource, ThreadRngJitter};
use crate::resilience::classifier::is_retryable;
use crate::resilience::failure::{Failure, InvokeResult};
use crate::resilience::policy::RetryPolicy;

/// Per-invocation retry driver.
///
/// Built once per call and consumed by [`Invoker::invoke`]; nothing carries
/// over from one invocation to the next.
pub struct Invoker {
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
    jitter: Box<dyn JitterSource>,
    cancel: Option<CancellationToken>,
}

impl Invoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: Arc::new(NoopObserver),
            jitter: Box::new(ThreadRngJitter),
            cancel: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the random source used for jitter.
    pub fn with_jitter<J>(mut self, jitter: J) -> Self
    where
        J: JitterSource + 'static,
    {
        self.jitter = Box::new(jitter);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn give_up(&self, record: &AttemptRecord, reason: GiveUpReason, failure: Failure) -> Failure {
        self.observer.on_give_up(record, reason);
        failure
    }

    /// Drive `operation` to completion under this invoker's policy.
    pub async fn invoke<T, F, Fut>(mut self, mut operation: F) -> InvokeResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = InvokeResult<T>>,
    {
        let planned = self.policy.total_attempts();
        let mut attempt: u32 = 1;

        loop {
            if self.is_cancelled() {
                // Only attempts that actually ran are reported.
                let record = AttemptRecord::failed(attempt - 1, planned, &Failure::Cancelled);
                return Err(self.give_up(&record, GiveUpReason::Cancelled, Failure::Cancelled));
            }

            let failure = match operation().await {
                Ok(value) => {
                    self.observer.on_success(attempt, planned);
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            let record = AttemptRecord::failed(attempt, planned, &failure);
            self.observer.on_attempt_failed(&record);

            // In-flight attempts are never aborted, but a cancellation seen on
            // return wins over whatever the attempt reported.
            if failure.is_cancelled() || self.is_cancelled() {
                return Err(self.give_up(&record, GiveUpReason::Cancelled, Failure::Cancelled));
            }
            if attempt > self.policy.max_retries {
                return Err(self.give_up(&record, GiveUpReason::Exhausted, failure));
            }
            if !is_retryable(&failure, attempt, &self.policy) {
                return Err(self.give_up(&record, GiveUpReason::NonRetryable, failure));
            }

            let delay = calculate_backoff(attempt, &self.policy, self.jitter.as_mut());
            let record = record.with_delay(delay);
            self.observer.on_retry_scheduled(&record);

            match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(self.give_up(&record, GiveUpReason::Cancelled, Failure::Cancelled));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }

            attempt = attempt.saturating_add(1);
        }
    }
}

/// Run `operation` with retries under `policy`.
pub async fn invoke_with_retry<T, F, Fut>(operation: F, policy: RetryPolicy) -> InvokeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = InvokeResult<T>>,
{
    Invoker::new(policy).invoke(operation).await
}

/// Same as [`invoke_with_retry`].
pub async fn retryable<T, F, Fut>(operation: F, policy: RetryPolicy) -> InvokeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = InvokeResult<T>>,
{
    invoke_with_retry(operation, policy).await
}
