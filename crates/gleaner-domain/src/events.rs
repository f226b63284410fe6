//! Structured run events
//!
//! A run executes on a background worker and must never touch its host's
//! state directly. Everything the host needs to show an operator flows
//! through an [`EventSink`], so the core depends on a capability rather
//! than on any particular front end.

use serde::{Deserialize, Serialize};

/// One event emitted by a running extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Operator-visible narration line
    Log(String),

    /// An item is about to be processed (`index` is 1-based)
    Progress {
        /// Position of the item in config order, starting at 1
        index: usize,
        /// Total number of configured items
        total: usize,
        /// Display key of the item
        data_name: String,
    },

    /// The run finished; all records were produced
    Done(RunSummary),
}

/// Found/not-found counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of items processed (always equals the number configured)
    pub total: usize,
    /// Items with an accepted value
    pub found: usize,
    /// Items without one
    pub not_found: usize,
}

/// Capability for receiving run events.
///
/// Implementations must be cheap and non-blocking; the worker emits events
/// inline between items.
pub trait EventSink: Send + Sync {
    /// Deliver one event to the host.
    fn emit(&self, event: RunEvent);
}

/// Sink that discards every event. Useful in tests and headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RunEvent) {}
}
