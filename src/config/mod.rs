//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) / CLI flags
//!     → loader.rs (parse & deserialize)
//!     → schema.rs PolicyOverrides (partial, every field optional)
//!     → merged over RetryPolicy::default()
//!     → validation.rs (semantic checks)
//!     → RetryPolicy (validated, immutable per invocation)
//! ```
//!
//! # Design Decisions
//! - Defaults are an explicit value, never mutable global state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{InvokerConfig, ObservabilityConfig, PolicyOverrides};
pub use validation::ValidationError;
