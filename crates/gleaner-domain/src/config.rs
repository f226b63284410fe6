//! Run configuration loading
//!
//! The run configuration is authored by an external settings tool and read
//! exactly once per run. It is loaded explicitly and handed to the
//! orchestrator at construction; a broken file is a constructor-time error,
//! never a process-wide side effect.

use crate::item::ItemSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the run configuration. Both variants are fatal to a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("configuration file not found: {0}")]
    Missing(PathBuf),

    /// The configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Unreadable(#[from] std::io::Error),

    /// The configuration file is not valid JSON in the expected shape
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The run configuration: a document root and an ordered item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory all item paths are resolved under
    pub root: PathBuf,

    /// Ordered extraction tasks; record order follows this order
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

impl RunConfig {
    /// Load the run configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
