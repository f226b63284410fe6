//! Check command implementation.
//!
//! Dry-runs the configuration: loads it, validates the document root, and
//! resolves every item path, without touching a model.

use crate::error::Result;
use crate::output::Formatter;
use gleaner_domain::{resolve_under_root, ItemSpec, RunConfig};
use gleaner_pipeline::PipelineError;
use std::path::Path;

/// Execute the check command.
pub fn execute_check(config_path: &Path, formatter: &Formatter) -> Result<()> {
    let config = RunConfig::load(config_path)?;

    if !config.root.is_dir() {
        return Err(PipelineError::RootInvalid(config.root.clone()).into());
    }
    println!(
        "{}",
        formatter.success(&format!("document root: {}", config.root.display()))
    );

    let mut issues = 0usize;
    for item in &config.items {
        match inspect(&config, item) {
            Finding::Ok => {
                println!("{}", formatter.success(&item.data_name));
            }
            Finding::Warn(detail) => {
                issues += 1;
                println!(
                    "{}",
                    formatter.warning(&format!("{}: {}", item.data_name, detail))
                );
            }
        }
    }

    if issues == 0 {
        println!(
            "{}",
            formatter.success(&format!("{} item(s), no issues", config.items.len()))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!(
                "{} of {} item(s) would produce no value",
                issues,
                config.items.len()
            ))
        );
    }

    Ok(())
}

enum Finding {
    Ok,
    Warn(String),
}

fn inspect(config: &RunConfig, item: &ItemSpec) -> Finding {
    if item.file.trim().is_empty() {
        return Finding::Warn("no file configured".to_string());
    }

    let path = match resolve_under_root(&config.root, &item.file) {
        Ok(path) => path,
        Err(err) => return Finding::Warn(err.to_string()),
    };
    if !path.is_file() {
        return Finding::Warn(format!("not a file: {}", path.display()));
    }

    if item.keywords.iter().all(|k| k.trim().is_empty()) {
        return Finding::Warn("no keywords configured".to_string());
    }

    Finding::Ok
}
