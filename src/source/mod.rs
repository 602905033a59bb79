//! Rule-document source.
//!
//! # Data Flow
//! ```text
//! rule document (JSON, on disk)
//!     → document.rs (read & decode into node descriptors)
//!     → reconciliation loop (parse, compile, validate, publish)
//!
//! On document change:
//!     watcher.rs detects modify/create
//!     → emits a reload event
//!     → reconciliation loop runs an immediate pass
//! ```
//!
//! # Design Decisions
//! - The document is re-read in full on every pass; there is no partial
//!   or incremental reload
//! - A document that fails to load or decode skips the whole pass; the
//!   store keeps serving every previously published snapshot
//! - The watcher only signals; loading stays with the reconciler so a
//!   single code path handles both tick- and event-driven passes

pub mod document;
pub mod watcher;

pub use document::{load_document, NodeSpec, RuleDocument, SourceError};
pub use watcher::DocumentWatcher;
