//! Gleaner Extraction Orchestrator
//!
//! Drives one extraction run end to end: validates the document root,
//! brings the model provider up, walks the configured items strictly in
//! order, classifies every outcome, persists the dataset, and reports a
//! summary. Per-item faults never abort a run; run-level faults abort
//! before any item is touched.
//!
//! The orchestrator talks to its host only through an
//! [`EventSink`](gleaner_domain::EventSink), so it can run on a background
//! task while the host stays responsive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod persist;
pub mod prompt;
pub mod runner;

use gleaner_domain::RunEvent;
use tokio::sync::mpsc::UnboundedSender;

pub use persist::{save_records, PersistError};
pub use prompt::PromptBuilder;
pub use runner::{Diagnostic, PipelineError, RunOutcome, RunState, Runner};

/// [`EventSink`](gleaner_domain::EventSink) backed by an unbounded channel.
///
/// The worker side emits without blocking; a dropped receiver just means
/// the host stopped listening, which is not the worker's problem.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub UnboundedSender<RunEvent>);

impl gleaner_domain::EventSink for ChannelSink {
    fn emit(&self, event: RunEvent) {
        let _ = self.0.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_domain::EventSink;

    #[tokio::test]
    async fn channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelSink(tx);
        sink.emit(RunEvent::Log("hello".to_string()));

        assert_eq!(rx.recv().await, Some(RunEvent::Log("hello".to_string())));
    }

    #[tokio::test]
    async fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        ChannelSink(tx).emit(RunEvent::Log("into the void".to_string()));
    }
}
