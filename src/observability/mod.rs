//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Invocation loop produces attempt events:
//!     → observer.rs (RetryObserver seam, AttemptRecord)
//!         → TracingObserver (structured log events)
//!         → metrics.rs MetricsObserver (counters, histograms)
//!         → RecordingObserver (in-memory report / JSON)
//!
//! Binaries:
//!     → logging.rs (subscriber setup, EnvFilter)
//! ```
//!
//! # Design Decisions
//! - The core is silent by default (`NoopObserver`)
//! - Observers are composable via `CompositeObserver`

pub mod logging;
pub mod metrics;
pub mod observer;

pub use observer::{
    AttemptRecord, CompositeObserver, GiveUpReason, InvocationReport, NoopObserver,
    RecordedOutcome, RecordingObserver, RetryObserver, TracingObserver,
};
pub use self::metrics::MetricsObserver;
