//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use serde::Serialize;
use shelf_core::{Counts, FileOutcome};
use std::io::{self, Write};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Write output using the configured format.
    ///
    /// The `data` parameter must be a serializable struct that includes a
    /// `success: bool` field. The `text_fn` closure is called only in text
    /// mode to generate the human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub error: String,
}

/// Output of the `run` command.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub success: bool,
    pub counts: Counts,
    pub outcomes: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Output of the `fingerprint` command.
#[derive(Debug, Serialize)]
pub struct FingerprintOutput {
    pub success: bool,
    pub digest: String,
}

/// Output of the `verify` command.
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub success: bool,
    pub expected: String,
    pub actual: String,
    pub matched: bool,
}
