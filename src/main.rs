//! Binary entrypoint that runs the PRISM agent demo.

use std::process::ExitCode;

use prism_agent::start_prism_agent;

/// Summarize the sample chunks (or a JSON file of chunks) and log the metrics.
fn main() -> ExitCode {
    start_prism_agent::run()
}
