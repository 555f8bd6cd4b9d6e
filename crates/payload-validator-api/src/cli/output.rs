//! Output formatting for the `validate` command
//!
//! The offline command prints the same body the HTTP endpoint would return,
//! either compact or indented.

use clap::ValueEnum;

use crate::handler::ValidationResponse;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Single-line JSON
    #[default]
    Json,
    /// Indented JSON
    Pretty,
}

/// Render a response body in the requested format
pub fn render(response: &ValidationResponse, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(response),
        OutputFormat::Pretty => serde_json::to_string_pretty(response),
    }
}
