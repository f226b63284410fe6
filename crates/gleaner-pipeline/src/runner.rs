//! Run orchestration
//!
//! A run moves through `Validating → Processing → Saving → Done`, with
//! `Failed` reachable from the setup stages. Items are processed strictly
//! sequentially in config order: the local inference engine serves one
//! request at a time, and log order must match config order. Every item
//! yields exactly one record; failed items additionally yield one
//! diagnostics entry, never more.

use crate::persist::save_records;
use crate::prompt::PromptBuilder;
use gleaner_domain::{
    resolve_under_root, EventSink, FailReason, ItemRecord, ItemSpec, ItemStatus, PathError,
    RunConfig, RunEvent, RunSummary, NULL_VALUE,
};
use gleaner_llm::{Cleaner, LlmError, Provider};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Run-level faults. All of them abort before any item is processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured root does not exist or is not a directory
    #[error("document root is not a directory: {0}")]
    RootInvalid(PathBuf),

    /// The model backend never became available
    #[error("model provider unavailable: {0}")]
    ModelUnavailable(#[source] LlmError),
}

/// Lifecycle stage of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, not yet started
    Idle,
    /// Checking root and bringing the provider up
    Validating,
    /// Walking the item list
    Processing,
    /// Writing the dataset
    Saving,
    /// Finished; records were produced for every item
    Done,
    /// Aborted on a run-level fault
    Failed,
}

/// One entry of the human-readable not-found report.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Display key of the failed item
    pub data_name: String,
    /// Relative path as configured
    pub file: String,
    /// Keyword hints as configured
    pub keywords: Vec<String>,
    /// Why the item produced no value
    pub reason: FailReason,
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// One record per configured item, in config order
    pub records: Vec<ItemRecord>,
    /// At most one entry per failed item
    pub diagnostics: Vec<Diagnostic>,
    /// Found / not-found counts
    pub summary: RunSummary,
    /// Set when the dataset could not be written; the records above are
    /// still complete
    pub persist_error: Option<String>,
}

/// Drives one extraction run.
pub struct Runner<P, S>
where
    P: Provider,
    S: EventSink,
{
    config: RunConfig,
    provider: P,
    cleaner: Cleaner,
    sink: S,
    output_path: PathBuf,
    state: RunState,
}

impl<P, S> Runner<P, S>
where
    P: Provider,
    S: EventSink,
{
    /// Create a runner over an already-loaded configuration.
    pub fn new(
        config: RunConfig,
        provider: P,
        cleaner: Cleaner,
        sink: S,
        output_path: impl AsRef<std::path::Path>,
    ) -> Self {
        Self {
            config,
            provider,
            cleaner,
            sink,
            output_path: output_path.as_ref().to_path_buf(),
            state: RunState::Idle,
        }
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run.
    ///
    /// The provider is stopped on every exit path, success or failure; a
    /// spawned inference engine never outlives the run that owns it.
    pub async fn run(&mut self) -> Result<RunOutcome, PipelineError> {
        let result = self.run_inner().await;
        self.provider.stop().await;
        if result.is_err() {
            self.state = RunState::Failed;
        }
        result
    }

    async fn run_inner(&mut self) -> Result<RunOutcome, PipelineError> {
        self.state = RunState::Validating;

        if !self.config.root.is_dir() {
            self.log(format!(
                "document root missing or not a directory: {}",
                self.config.root.display()
            ));
            return Err(PipelineError::RootInvalid(self.config.root.clone()));
        }

        self.log(format!("starting model provider ({})", self.provider.model()));
        self.provider
            .start()
            .await
            .map_err(PipelineError::ModelUnavailable)?;

        self.state = RunState::Processing;
        let items = self.config.items.clone();
        let total = items.len();
        self.log(format!("processing {total} items"));

        let mut records = Vec::with_capacity(total);
        let mut diagnostics = Vec::new();

        for (i, spec) in items.iter().enumerate() {
            self.sink.emit(RunEvent::Progress {
                index: i + 1,
                total,
                data_name: spec.data_name.clone(),
            });

            let record = self.process_item(spec).await;
            if let Some(reason) = record.reason {
                diagnostics.push(Diagnostic {
                    data_name: spec.data_name.clone(),
                    file: spec.file.clone(),
                    keywords: spec.keywords.clone(),
                    reason,
                });
            }
            records.push(record);
        }

        self.state = RunState::Saving;
        let persist_error = match save_records(&self.output_path, &records) {
            Ok(()) => {
                self.log(format!("results saved to {}", self.output_path.display()));
                None
            }
            Err(e) => {
                warn!("persisting results failed: {e}");
                self.log(format!("failed to save results: {e}"));
                Some(e.to_string())
            }
        };

        let found = records
            .iter()
            .filter(|r| r.status == ItemStatus::Found)
            .count();
        let summary = RunSummary {
            total,
            found,
            not_found: total - found,
        };
        info!(
            "run complete: {} found, {} not found",
            summary.found, summary.not_found
        );
        self.sink.emit(RunEvent::Done(summary));

        self.state = RunState::Done;
        Ok(RunOutcome {
            records,
            diagnostics,
            summary,
            persist_error,
        })
    }

    /// Classify one item. Never fails; every outcome is a record.
    async fn process_item(&self, spec: &ItemSpec) -> ItemRecord {
        // 1. Resolve the configured path under the root, fail-closed.
        let path = if spec.file.is_empty() {
            self.log(format!("{}: no file configured", spec.data_name));
            None
        } else {
            match resolve_under_root(&self.config.root, &spec.file) {
                Ok(path) => Some(path),
                Err(PathError::Escape(path)) => {
                    self.log(format!(
                        "{}: path escapes the document root: {}",
                        spec.data_name,
                        path.display()
                    ));
                    None
                }
                Err(PathError::Resolve(e)) => {
                    self.log(format!("{}: {} ({e})", spec.data_name, spec.file));
                    None
                }
            }
        };

        // 2. The target must exist as a regular file.
        let Some(path) = path.filter(|p| p.is_file()) else {
            return ItemRecord::not_found(spec, FailReason::FileMissing);
        };

        // 3. Extract text; a failure or blank text is one reason code.
        let text = match gleaner_text::extract(&path, spec.doc_type) {
            Ok(text) => text,
            Err(e) => {
                warn!("extraction failed for {}: {e}", path.display());
                self.log(format!("{}: text extraction failed: {e}", spec.data_name));
                return ItemRecord::not_found(spec, FailReason::ExtractionFailed);
            }
        };
        if text.trim().is_empty() {
            self.log(format!("{}: document produced no text", spec.data_name));
            return ItemRecord::not_found(spec, FailReason::ExtractionFailed);
        }

        // 4. Without keywords there is nothing to ask the model.
        if spec.keywords.is_empty() {
            self.log(format!("{}: no keywords configured", spec.data_name));
            return ItemRecord::not_found(spec, FailReason::NoKeywords);
        }

        // 5. One query; failures degrade to "null" and the run continues.
        let prompt = PromptBuilder::new(&text, &spec.keywords).build();
        let raw = match self.provider.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("model query failed for {}: {e}", spec.data_name);
                self.log(format!("{}: model query failed: {e}", spec.data_name));
                String::new()
            }
        };

        let value = self.cleaner.clean(&raw);
        if value.is_empty() || value == NULL_VALUE {
            self.log(format!("{}: model found no value", spec.data_name));
            ItemRecord::not_found(spec, FailReason::ValueNotFound)
        } else {
            self.log(format!("{}: found {value}", spec.data_name));
            ItemRecord::found(spec, value)
        }
    }

    fn log(&self, message: String) {
        info!("{message}");
        self.sink.emit(RunEvent::Log(message));
    }
}
