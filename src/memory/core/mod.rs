//! Core memory types and identifiers.

pub mod config;
pub mod errors;
pub mod ids;
pub mod record;

pub use config::{AgentConfig, LlmConfig, LlmProvider, MemoryConfig};
pub use errors::{MemoryError, MemoryResult};
pub use ids::{ChunkId, ChunkIdError};
pub use record::{Chunk, MemoryRecord};
