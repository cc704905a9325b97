//! Shutdown coordination.

use tokio_util::sync::CancellationToken;

/// Coordinator for caller-driven cancellation.
///
/// Hands out child tokens to invocations; triggering the coordinator
/// cancels every one of them. A token handed out after the trigger is
/// already cancelled.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for one invocation.
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }
}
