//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every child CancellationToken cancelled
//!     → invokers abort their backoff wait, schedule no further attempt
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
