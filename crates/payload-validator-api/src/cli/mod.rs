//! CLI module for the payload validator
//!
//! `serve` runs the HTTP service; `validate` checks a payload file against a
//! schema file and prints the response body the service would have returned.

pub mod commands;
pub mod output;

pub use commands::{Cli, CliError, Commands, ServeOverrides};
pub use output::OutputFormat;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, payload is valid
    Success = 0,
    /// Payload failed validation
    ValidationError = 1,
    /// Schema is misconfigured
    SchemaError = 3,
    /// Input file missing, unreadable or not JSON
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Run the CLI and return the exit code
pub fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_format,
            max_body_size,
            cache_capacity,
        } => commands::execute_serve(
            config,
            ServeOverrides {
                host,
                port,
                log_format,
                max_body_size,
                cache_capacity,
            },
        ),
        Commands::Validate {
            schema,
            data,
            format,
            normalized,
        } => commands::execute_validate(schema, data, format, normalized),
    }
}

/// Run the CLI, reporting any error on stderr
pub fn run_cli(cli: Cli) -> ExitCode {
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
