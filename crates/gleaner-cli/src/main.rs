//! Gleaner - pull named values out of office documents with a language model.

use clap::Parser;
use gleaner_cli::{commands, Cli, Command, Formatter, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Progress narration flows through the event channel; tracing stays
    // quiet unless the operator asks for it via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> gleaner_cli::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|_| Settings::default());
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &cli.config, &settings, &formatter).await?;
        }
        Command::Check => {
            commands::execute_check(&cli.config, &formatter)?;
        }
    }

    Ok(())
}
