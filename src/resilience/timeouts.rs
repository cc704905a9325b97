//! Timeout enforcement.
//!
//! The invoker never imposes a deadline on an attempt. Callers that want one
//! wrap the attempt future with [`with_deadline`], which turns an elapsed
//! deadline into a retryable `Failure::Timeout`.

use std::future::Future;
use std::time::Duration;

use crate::resilience::failure::Failure;

/// Run `fut`, failing with `Failure::Timeout` if it does not finish within `deadline`.
pub async fn with_deadline<T, Fut>(deadline: Duration, fut: Fut) -> Result<T, Failure>
where
    Fut: Future<Output = Result<T, Failure>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(Failure::timeout(deadline)),
    }
}
