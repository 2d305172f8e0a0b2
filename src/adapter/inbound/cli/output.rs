//! CLI output formatting.
//!
//! Every command produces a [`Report`]: a JSON value for scripting and a
//! rendered table for humans. The global JSON switch picks which one is
//! printed.

use std::sync::{OnceLock, RwLock};

use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled};

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
}

/// Global output configuration singleton.
static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Output of one command in both renderings.
#[derive(Debug, Clone)]
pub struct Report {
    pub json: serde_json::Value,
    pub text: String,
}

impl Report {
    /// Build a report from a serializable value and table rows.
    pub fn table<T: Serialize, R: Tabled>(value: &T, rows: Vec<R>) -> Self {
        Self {
            json: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            text: Table::new(rows).to_string(),
        }
    }

    /// Build a report holding a single line of text.
    pub fn line<T: Serialize>(value: &T, text: impl Into<String>) -> Self {
        Self {
            json: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            text: text.into(),
        }
    }

    /// The rendering selected by the global output mode.
    #[must_use]
    pub fn render(&self) -> String {
        if is_json() {
            self.json.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// Print a report to stdout.
pub fn emit(report: &Report) {
    println!("{}", report.render());
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("error: {message}");
}
