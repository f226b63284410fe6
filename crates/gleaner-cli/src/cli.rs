//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gleaner - pull named values out of office documents with a language model.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run configuration file (root + items)
    #[arg(short, long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every configured item and write the dataset
    Run(RunArgs),

    /// Validate the configuration and item paths without querying a model
    Check,
}

/// Model backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Locally hosted inference engine (spawned if not already serving)
    Local,
    /// Remote chat-completions API (credential from the key file)
    Remote,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Model backend (defaults to the settings file)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Provider endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key file for the remote provider
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Where to write the dataset
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_parses_with_overrides() {
        let cli = Cli::parse_from([
            "gleaner",
            "run",
            "--provider",
            "remote",
            "--model",
            "some/model",
            "--output",
            "out.json",
        ]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.provider, Some(ProviderArg::Remote));
                assert_eq!(args.model.as_deref(), Some("some/model"));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn config_path_defaults() {
        let cli = Cli::parse_from(["gleaner", "check"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(matches!(cli.command, Command::Check));
    }
}
