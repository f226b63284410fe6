//! Run command implementation.

use crate::cli::{ProviderArg, RunArgs};
use crate::config::{ProviderKind, Settings};
use crate::error::Result;
use crate::output::Formatter;
use gleaner_domain::RunConfig;
use gleaner_llm::{Cleaner, LocalProvider, Provider, RemoteProvider};
use gleaner_pipeline::{ChannelSink, Runner};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Execute the run command.
///
/// The runner lives on a background task; this task drains its events and
/// prints them as they arrive, then renders the final report.
pub async fn execute_run(
    args: RunArgs,
    config_path: &Path,
    settings: &Settings,
    formatter: &Formatter,
) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let provider = build_provider(&args, settings)?;
    let cleaner = Cleaner::new(settings.cleaning.clone())?;
    let output = output_path(&args, settings);

    println!(
        "Processing {} item(s) with model {}",
        config.items.len(),
        provider.model()
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = Runner::new(config, provider, cleaner, ChannelSink(tx), &output);
    let handle = tokio::spawn(async move { runner.run().await });

    // The sender is owned by the runner, so this loop ends when the run does.
    while let Some(event) = rx.recv().await {
        if let Some(line) = formatter.format_event(&event) {
            println!("{}", line);
        }
    }

    let outcome = handle.await??;

    println!();
    println!("{}", formatter.format_summary(&outcome.summary));

    if let Some(table) = formatter.format_diagnostics(&outcome.diagnostics) {
        println!();
        println!("{}", formatter.warning("Items without a value:"));
        println!("{}", table);
    }

    match outcome.persist_error {
        Some(reason) => {
            println!(
                "{}",
                formatter.error(&format!(
                    "dataset could not be written to {}: {}",
                    output.display(),
                    reason
                ))
            );
        }
        None => {
            println!(
                "{}",
                formatter.success(&format!("dataset written to {}", output.display()))
            );
        }
    }

    Ok(())
}

/// Resolve flag overrides against the settings file.
fn build_provider(args: &RunArgs, settings: &Settings) -> Result<Box<dyn Provider>> {
    let kind = match args.provider {
        Some(ProviderArg::Local) => ProviderKind::Local,
        Some(ProviderArg::Remote) => ProviderKind::Remote,
        None => settings.provider,
    };

    match kind {
        ProviderKind::Local => {
            let endpoint = args
                .endpoint
                .clone()
                .unwrap_or_else(|| settings.local.endpoint.clone());
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| settings.local.model.clone());
            Ok(Box::new(LocalProvider::new(endpoint, model)))
        }
        ProviderKind::Remote => {
            let endpoint = args
                .endpoint
                .clone()
                .unwrap_or_else(|| settings.remote.endpoint.clone());
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| settings.remote.model.clone());
            let key_file = args
                .key_file
                .clone()
                .unwrap_or_else(|| settings.remote.key_file.clone());
            let provider = RemoteProvider::from_key_file(endpoint, model, &key_file)?;
            Ok(Box::new(provider))
        }
    }
}

fn output_path(args: &RunArgs, settings: &Settings) -> PathBuf {
    args.output
        .clone()
        .or_else(|| settings.output.clone())
        .unwrap_or_else(|| PathBuf::from("data.json"))
}
