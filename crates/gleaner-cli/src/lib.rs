//! Gleaner CLI library.
//!
//! Wires the extraction pipeline to the command line: tool settings with
//! flag overrides, provider construction, the background run task, and
//! operator-facing output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Settings;
pub use error::{CliError, Result};
pub use output::Formatter;
