//! Gleaner Domain Layer
//!
//! Core data model for the gleaner extraction pipeline: the run
//! configuration contract, per-item specifications and result records,
//! the closed set of not-found reason codes, path containment, and the
//! structured events a run emits toward its host.
//!
//! ## Key Concepts
//!
//! - **Item**: one configured extraction task (file + keywords + display name)
//! - **Record**: the per-item outcome; exactly one per item, in config order
//! - **Reason**: closed diagnostic vocabulary shared with downstream tools
//! - **Root**: the directory every item path must resolve under
//!
//! Infrastructure (document parsing, model providers, the orchestrator)
//! lives in the other workspace crates; this crate stays dependency-light
//! so every layer can share the same vocabulary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod events;
pub mod item;
pub mod paths;

// Re-exports for convenience
pub use config::{ConfigError, RunConfig};
pub use events::{EventSink, NullSink, RunEvent, RunSummary};
pub use item::{DocType, FailReason, ItemRecord, ItemSpec, ItemStatus, NULL_VALUE};
pub use paths::{resolve_under_root, PathError};
