//! Tool settings
//!
//! Everything that is about *how* to run rather than *what* to extract:
//! provider selection, model names, endpoints, the API key file, and the
//! localizable cleaning rules. Stored as TOML under the user's home
//! directory; every field has a default, and the first load writes the
//! defaults out so the operator has a file to edit.
//!
//! The run configuration (root + items) is a separate contract and lives
//! in `gleaner-domain`.

use crate::error::{CliError, Result};
use gleaner_llm::{local, remote, CleanRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which backend a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Locally hosted inference engine
    #[default]
    Local,
    /// Remote chat-completions API
    Remote,
}

/// Local-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    /// Loopback endpoint of the inference engine
    pub endpoint: String,
    /// Model to ask for
    pub model: String,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            endpoint: local::DEFAULT_ENDPOINT.to_string(),
            model: local::DEFAULT_MODEL.to_string(),
        }
    }
}

/// Remote-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// API base URL
    pub endpoint: String,
    /// Model to ask for
    pub model: String,
    /// Plain-text file holding the bearer credential
    pub key_file: PathBuf,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            endpoint: remote::DEFAULT_ENDPOINT.to_string(),
            model: remote::DEFAULT_MODEL.to_string(),
            key_file: PathBuf::from("api.txt"),
        }
    }
}

/// Tool settings, TOML-backed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend used when the run command gives no `--provider`
    pub provider: ProviderKind,

    /// Local backend parameters
    pub local: LocalSettings,

    /// Remote backend parameters
    pub remote: RemoteSettings,

    /// Reply-cleaning rules; defaults match the source deployment
    pub cleaning: CleanRules,

    /// Default dataset path for the run command
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Settings file location.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("could not find home directory".into()))?;
        Ok(home.join(".gleaner").join("settings.toml"))
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load settings from `path`.
    ///
    /// A missing file means defaults; they are also written back so the
    /// operator finds an editable settings file after the first run. A
    /// failed write is not an error, the defaults still apply.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let settings = Self::default();
            settings.save_to(path).ok();
            Ok(settings)
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize settings: {e}")))?;
        fs::write(path, contents)?;
        Ok(())
    }
}
