//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! Invoker attempt
//!     → client.rs (reqwest GET, optional per-attempt deadline)
//!     → classify_error / classify_status (reqwest outcome → Failure)
//!     → back to the invoker for retry decisions
//! ```

pub mod client;

pub use client::{classify_error, classify_status, FetchedResponse, HttpFetcher, X_REQUEST_ID};
