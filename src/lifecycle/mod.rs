//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown_signal() completes
//!     → Shutdown::trigger()
//!
//! Shutdown (shutdown.rs):
//!     broadcast to the reconciler and the discovery API
//!     → loop stops between passes, server drains in-flight requests
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every long-running task
//! - The reconciler observes shutdown between passes; an in-flight pass
//!   always runs to completion

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
