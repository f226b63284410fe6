//! Output formatting for the CLI.

use colored::*;
use gleaner_domain::{RunEvent, RunSummary};
use gleaner_pipeline::Diagnostic;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Render a pipeline event as a status line.
    pub fn format_event(&self, event: &RunEvent) -> Option<String> {
        match event {
            RunEvent::Log(message) => Some(self.colorize(message, "dimmed")),
            RunEvent::Progress {
                index,
                total,
                data_name,
            } => Some(format!(
                "{} {}",
                self.colorize(&format!("[{}/{}]", index, total), "cyan"),
                data_name
            )),
            // The summary gets its own block at the end of the run.
            RunEvent::Done(_) => None,
        }
    }

    /// Render the run summary.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let found = format!("{} found", summary.found);
        let not_found = format!("{} without a value", summary.not_found);
        format!(
            "Processed {} item(s): {}, {}",
            summary.total,
            self.colorize(&found, "green"),
            self.colorize(&not_found, "yellow"),
        )
    }

    /// Render the items that produced no value as a table.
    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> Option<String> {
        if diagnostics.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        builder.push_record(["Item", "File", "Keywords", "Reason"]);

        for diag in diagnostics {
            builder.push_record([
                diag.data_name.clone(),
                diag.file.clone(),
                diag.keywords.join(", "),
                diag.reason.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Some(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "dimmed" => text.dimmed().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_domain::FailReason;

    #[test]
    fn progress_lines_are_one_based() {
        let formatter = Formatter::new(false);
        let line = formatter
            .format_event(&RunEvent::Progress {
                index: 1,
                total: 3,
                data_name: "contract_number".to_string(),
            })
            .unwrap();
        assert_eq!(line, "[1/3] contract_number");
    }

    #[test]
    fn done_event_produces_no_line() {
        let formatter = Formatter::new(false);
        let event = RunEvent::Done(RunSummary {
            total: 0,
            found: 0,
            not_found: 0,
        });
        assert!(formatter.format_event(&event).is_none());
    }

    #[test]
    fn summary_counts_both_outcomes() {
        let formatter = Formatter::new(false);
        let text = formatter.format_summary(&RunSummary {
            total: 5,
            found: 3,
            not_found: 2,
        });
        assert!(text.contains("5 item(s)"));
        assert!(text.contains("3 found"));
        assert!(text.contains("2 without a value"));
    }

    #[test]
    fn empty_diagnostics_render_nothing() {
        let formatter = Formatter::new(false);
        assert!(formatter.format_diagnostics(&[]).is_none());
    }

    #[test]
    fn diagnostics_table_carries_the_reason() {
        let formatter = Formatter::new(false);
        let table = formatter
            .format_diagnostics(&[Diagnostic {
                data_name: "amount".to_string(),
                file: "missing.docx".to_string(),
                keywords: vec!["sum".to_string(), "total".to_string()],
                reason: FailReason::FileMissing,
            }])
            .unwrap();
        assert!(table.contains("amount"));
        assert!(table.contains("file missing or not specified"));
    }

    #[test]
    fn colorize_disabled_is_passthrough() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
