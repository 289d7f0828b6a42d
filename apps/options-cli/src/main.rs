//! # Inspector Options CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Load configuration and initialize tracing (logging)
//! 3. Open the JSON store and build the settings model
//! 4. Run the command, flush pending writes, exit

use std::process::ExitCode;

use clap::Parser;
use inspector_options_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    inspector_options_cli::run(Cli::parse()).await
}
