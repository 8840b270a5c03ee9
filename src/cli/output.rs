//! Output formatting for CLI commands
//!
//! Results go to stdout, diagnostics to stderr. In JSON mode every command
//! prints exactly one JSON document so output can be piped into `jq`.

use serde::Serialize;

use crate::domain::{Snapshot, StateChange};
use crate::storage;

const RULE_WIDTH: usize = 60;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper shared by all commands
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints a confirmation line, or `{"success": true, ...}` in JSON mode
    pub fn success(&self, message: &str) {
        if self.is_json() {
            println!("{}", serde_json::json!({ "success": true, "message": message }));
        } else {
            println!("{}", message);
        }
    }

    /// Prints a serializable value; pretty-printed in text mode
    pub fn data<T: Serialize>(&self, data: &T) {
        let encoded = if self.is_json() {
            serde_json::to_string(data)
        } else {
            serde_json::to_string_pretty(data)
        };

        if let Ok(json) = encoded {
            println!("{}", json);
        }
    }

    /// Prints a padded table header followed by a rule
    pub fn header(&self, columns: &[(&str, usize)], last: &str) {
        let mut line = String::new();
        for (name, width) in columns {
            line.push_str(&format!("{:<width$} ", name, width = *width));
        }
        line.push_str(last);

        println!("{}", line);
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    /// Prints one line per state change, titles taken from `snapshot`
    pub fn changes(&self, snapshot: &Snapshot, changes: &[StateChange]) {
        for change in changes {
            let title = snapshot
                .get(change.id)
                .map(|t| t.title.as_str())
                .unwrap_or_default();
            println!(
                "  {:<8} {:<12} -> {:<12} ({}) {}",
                change.id,
                change.from,
                change.to,
                change.rule.label(),
                title
            );
        }
    }

    /// Writes a tagged diagnostic to stderr when `--verbose` is set
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_format_maps_to_cli_format() {
        assert_eq!(OutputFormat::from(storage::OutputFormat::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(storage::OutputFormat::Text), OutputFormat::Text);
    }

    #[test]
    fn flags() {
        let output = Output::new(OutputFormat::Json, true);
        assert!(output.is_json());
        assert!(output.is_verbose());

        let output = Output::new(OutputFormat::default(), false);
        assert!(!output.is_json());
        assert!(!output.is_verbose());
    }
}
