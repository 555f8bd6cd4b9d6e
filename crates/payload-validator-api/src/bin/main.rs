//! Payload validator CLI
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service
//! payload-validator serve --config validator.toml
//!
//! # Validate a payload file offline
//! payload-validator validate --schema schema.json --data payload.json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Payload is valid (or the service shut down cleanly)
//! - 1: Payload failed validation
//! - 3: Schema is misconfigured
//! - 4: File not found, unreadable or not JSON
//! - 10: Internal error

use clap::Parser;
use payload_validator_api::{run_cli, Cli};

fn main() {
    let cli = Cli::parse();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
