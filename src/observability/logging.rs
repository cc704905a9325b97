//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber for binaries embedding the invoker
//! - Honor `RUST_LOG` first, then the configured level
//!
//! The library never installs a subscriber on its own.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("resilient_invoker={level},resilient_fetch={level}")
}

/// Install a global fmt subscriber. Fails if one is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
