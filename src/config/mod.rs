//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ControlPlaneConfig (validated, immutable)
//!     → shared with the reconciler and the discovery API at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the hot-reload path belongs to the
//!   rule document, not the process config
//! - All fields have defaults so a missing file still yields a runnable
//!   process
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports all violations at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ControlPlaneConfig, ObservabilityConfig, ReconcileConfig, ServerConfig, SourceConfig,
};
