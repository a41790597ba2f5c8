//! Startup helpers for the PRISM agent demo.
//!
//! Loads `.env`, reads the configuration from the environment, summarizes
//! a batch of chunks and logs the resulting performance metrics.

use std::path::Path;
use std::process::ExitCode;

use crate::memory::core::config::{AgentConfig, CAPACITY_ENV};
use crate::memory::core::errors::MemoryResult;
use crate::memory::core::record::Chunk;
use crate::memory::engine::NoteAgent;
use crate::memory::metrics::PerformanceMetrics;

/// Memory capacity used by the demo unless overridden.
pub const DEMO_CAPACITY: usize = 5;

/// Chunks processed when no input file is given.
pub const DEMO_CHUNKS: [&str; 3] = [
    "The sun rose over the horizon, casting golden rays across the landscape. Birds began their morning chorus. The air was crisp and clear.",
    "In the dense forest, ancient trees stood like silent guardians. Their branches swayed gently in the breeze. Leaves rustled softly.",
    "A clear stream meandered through the valley, its waters crystal clear. Fish darted beneath the surface. The water sparkled in the sunlight.",
];

/// Run the demo (used by the `prism-agent` binary).
///
/// The first command-line argument, if any, names a JSON file holding an
/// array of `{"text": "..."}` chunks.
///
/// # Returns
/// `ExitCode::SUCCESS` when the batch was processed, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting PRISM agent v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!("Ignoring unreadable .env file: {e}");
    }

    let config = match demo_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let chunks = match std::env::args().nth(1) {
        Some(path) => match load_chunks(Path::new(&path)) {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::error!("Failed to load chunks from {path}: {e}");
                return ExitCode::from(1);
            }
        },
        None => demo_chunks(),
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match rt.block_on(run_demo(config, &chunks)) {
        Ok(Some(metrics)) => {
            tracing::info!("Performance Metrics:");
            for line in metrics.to_string().lines() {
                tracing::info!("{line}");
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            tracing::warn!("No chunks were processed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Agent error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Initialize tracing with an env-driven filter, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Read the demo configuration from the environment.
///
/// # Errors
/// Returns an error if an environment value cannot be parsed.
pub fn demo_config() -> MemoryResult<AgentConfig> {
    demo_config_from(|key| std::env::var(key).ok())
}

/// Read the demo configuration through `lookup`.
///
/// The capacity defaults to [`DEMO_CAPACITY`] when the capacity variable
/// is unset or blank.
///
/// # Errors
/// Returns an error if a value cannot be parsed.
pub fn demo_config_from<F>(lookup: F) -> MemoryResult<AgentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let capacity_unset = lookup(CAPACITY_ENV).is_none_or(|value| value.trim().is_empty());
    let mut config = AgentConfig::from_lookup(lookup)?;
    if capacity_unset {
        config.memory.capacity = DEMO_CAPACITY;
    }
    Ok(config)
}

/// The built-in sample chunks.
#[must_use]
pub fn demo_chunks() -> Vec<Chunk> {
    DEMO_CHUNKS.iter().map(|text| Chunk::new(*text)).collect()
}

/// Parse a JSON array of chunks.
///
/// # Errors
/// Returns an error if the JSON is not an array of `{"text": ...}` objects.
pub fn parse_chunks(json: &str) -> MemoryResult<Vec<Chunk>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON array of chunks from a file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_chunks(path: &Path) -> MemoryResult<Vec<Chunk>> {
    let json = std::fs::read_to_string(path)?;
    parse_chunks(&json)
}

/// Build an agent from `config`, process `chunks` and aggregate metrics.
///
/// # Errors
/// Returns an error if the agent cannot be built.
pub async fn run_demo(
    config: AgentConfig,
    chunks: &[Chunk],
) -> MemoryResult<Option<PerformanceMetrics>> {
    let mut agent = NoteAgent::from_config(config)?;
    agent.process_chunks(chunks).await;
    tracing::info!(
        occupancy = agent.memory_usage(),
        evictions = agent.store().evictions(),
        "Batch processed"
    );
    Ok(agent.get_performance_metrics())
}
