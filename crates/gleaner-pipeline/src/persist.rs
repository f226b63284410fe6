//! Dataset persistence
//!
//! The record array is the sole contract with the downstream review and
//! template-filling tools. It is written once per run, replacing any prior
//! content wholesale; the core never re-reads its own output.

use gleaner_domain::ItemRecord;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure writing the dataset. The records themselves are not lost; the
/// caller still holds them in the run outcome.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem write failure
    #[error("failed to write dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Records could not be serialized
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write the record array as pretty-printed JSON, replacing `path`.
pub fn save_records(path: &Path, records: &[ItemRecord]) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
