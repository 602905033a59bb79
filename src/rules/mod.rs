//! Routing-rule subsystem.
//!
//! # Data Flow
//! ```text
//! Raw mapping string ("prefix -> host[:port]")
//!     → parser.rs (split, trim, port default)
//!     → DomainRule (validated domain record)
//!     → consumed by the snapshot compiler
//! ```
//!
//! # Design Decisions
//! - Parsing is a pure function: same input always yields the same rule
//! - Malformed input is a hard parse failure, never a silent default
//! - Only the port is defaulted (80), and only when absent or empty

pub mod parser;

pub use parser::{parse, DomainRule, ParseError};
