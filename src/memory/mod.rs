//! Memory subsystem for the PRISM note agent.
//!
//! This module is organized into:
//! - `core`: Configuration, errors, identifiers, chunks and records
//! - `store`: Capacity-bounded store with FIFO eviction
//! - `metrics`: Processing counters and their aggregates
//! - `summarization`: Two-sentence summaries with a sentinel fallback
//! - `engine`: The agent tying summarize, store, evict and metrics together

pub mod core;
pub mod engine;
pub mod metrics;
pub mod store;
pub mod summarization;

// Re-export commonly used types for convenience
pub use self::core::{
    AgentConfig, Chunk, ChunkId, ChunkIdError, LlmConfig, LlmProvider, MemoryConfig, MemoryError,
    MemoryRecord, MemoryResult,
};
pub use engine::{NoteAgent, SharedNoteAgent};
pub use metrics::{MetricsLog, PerformanceMetrics};
pub use store::BoundedMemoryStore;
pub use summarization::{SUMMARY_FAILED, Summarizer, summary_prompt};
