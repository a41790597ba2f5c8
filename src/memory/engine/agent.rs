//! Note agent orchestration.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::llm::{self, CompletionBackend};
use crate::memory::core::config::AgentConfig;
use crate::memory::core::errors::{MemoryError, MemoryResult};
use crate::memory::core::ids::ChunkId;
use crate::memory::core::record::{Chunk, MemoryRecord};
use crate::memory::metrics::log::{MetricsLog, PerformanceMetrics};
use crate::memory::store::bounded_store::BoundedMemoryStore;
use crate::memory::summarization::summarizer::Summarizer;

/// Agent that summarizes chunks into a bounded memory.
///
/// Owns exactly one store and one metrics log. Mutating calls take
/// `&mut self`; share an agent across tasks through
/// [`SharedNoteAgent`](crate::memory::engine::SharedNoteAgent).
pub struct NoteAgent {
    config: AgentConfig,
    store: BoundedMemoryStore,
    metrics: MetricsLog,
    summarizer: Summarizer,
}

impl NoteAgent {
    /// Create an agent over an explicit completion backend.
    ///
    /// # Errors
    /// Returns an error if the memory capacity or the completion timeout
    /// is zero.
    pub fn new(config: AgentConfig, backend: Arc<dyn CompletionBackend>) -> MemoryResult<Self> {
        if config.llm.timeout_seconds == 0 {
            return Err(MemoryError::InvalidConfig(
                "llm.timeout_seconds must be > 0".to_string(),
            ));
        }

        let store = BoundedMemoryStore::with_capacity(config.memory.capacity)?;
        let summarizer = Summarizer::new(&config.llm, backend);

        Ok(Self {
            config,
            store,
            metrics: MetricsLog::new(),
            summarizer,
        })
    }

    /// Create an agent with the backend selected by the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the backend
    /// cannot be built.
    pub fn from_config(config: AgentConfig) -> MemoryResult<Self> {
        config.validate()?;
        let backend = llm::build_backend(&config.llm)?;
        Self::new(config, backend)
    }

    /// Summarize one chunk and store it, evicting the oldest record when full.
    ///
    /// Never fails: a failed summarization still stores a record carrying
    /// the sentinel summary.
    pub async fn update_memory(&mut self, chunk: &Chunk) -> ChunkId {
        let start = Instant::now();

        if self.store.is_full() {
            self.store.evict_oldest();
        }

        let summary = self.summarizer.summarize(&chunk.text).await;
        let id = self
            .store
            .insert(MemoryRecord::new(chunk.text.clone(), summary));

        let elapsed = start.elapsed();
        self.metrics
            .record(elapsed, self.store.len(), chunk.char_len());
        debug!(chunk_id = %id, ?elapsed, occupancy = self.store.len(), "Updated memory");

        id
    }

    /// Process chunks in order, reporting each stored summary.
    ///
    /// Returns the identifiers assigned, in input order.
    pub async fn process_chunks(&mut self, chunks: &[Chunk]) -> Vec<ChunkId> {
        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let id = self.update_memory(chunk).await;
            if let Some(record) = self.store.get(id) {
                info!(
                    chunk_id = %id,
                    created_at = %record.created_at().to_rfc3339(),
                    "Processed chunk: {}",
                    record.summary()
                );
            }
            ids.push(id);
        }
        ids
    }

    /// Aggregate metrics, or `None` before the first chunk.
    #[must_use]
    pub fn get_performance_metrics(&self) -> Option<PerformanceMetrics> {
        self.metrics.summary()
    }

    /// Summary stored for `id`, if the record is still held.
    #[must_use]
    pub fn summary_of(&self, id: ChunkId) -> Option<&str> {
        self.store.get(id).map(MemoryRecord::summary)
    }

    /// Number of records currently held.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.store.len()
    }

    /// Read access to the memory store.
    #[must_use]
    pub const fn store(&self) -> &BoundedMemoryStore {
        &self.store
    }

    /// Read access to the metrics log.
    #[must_use]
    pub const fn metrics(&self) -> &MetricsLog {
        &self.metrics
    }

    /// Configuration the agent was built with.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::llm::CompletionError;
    use crate::llm::mock::MockBackend;
    use crate::memory::core::config::LlmProvider;
    use crate::memory::summarization::summarizer::SUMMARY_FAILED;

    fn config(capacity: usize) -> AgentConfig {
        let mut config = AgentConfig::default();
        config.memory.capacity = capacity;
        config
    }

    fn agent(capacity: usize, backend: MockBackend) -> MemoryResult<NoteAgent> {
        NoteAgent::new(config(capacity), Arc::new(backend))
    }

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            Chunk::new("First test chunk. Contains two sentences."),
            Chunk::new("Second test chunk. Another two sentences."),
            Chunk::new("Third test chunk. Final test sentences."),
        ]
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(NoteAgent::new(config(0), Arc::new(MockBackend::fixed("s"))).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = config(3);
        config.llm.timeout_seconds = 0;
        assert!(NoteAgent::new(config, Arc::new(MockBackend::fixed("s"))).is_err());
    }

    #[test]
    fn test_from_config_validates() -> MemoryResult<()> {
        assert!(NoteAgent::from_config(config(3)).is_err());

        let mut config = config(3);
        config.llm.provider = LlmProvider::Extractive;
        let agent = NoteAgent::from_config(config)?;
        assert_eq!(agent.config().memory.capacity, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_capacity_invariant() -> MemoryResult<()> {
        let mut agent = agent(3, MockBackend::fixed("summary"))?;
        for i in 0..7 {
            agent.update_memory(&Chunk::new(format!("chunk {i}"))).await;
            assert!(agent.memory_usage() <= 3);
        }
        assert_eq!(agent.memory_usage(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_fifo_eviction() -> MemoryResult<()> {
        let mut agent = agent(3, MockBackend::fixed("summary"))?;
        let mut ids = Vec::new();
        for text in ["one", "two", "three", "four"] {
            ids.push(agent.update_memory(&Chunk::new(text)).await);
        }

        assert!(!agent.store().contains(ids[0]));
        let contents: Vec<&str> = agent.store().iter().map(|(_, r)| r.content()).collect();
        assert_eq!(contents, vec!["two", "three", "four"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_sentinel_stored_on_failure() -> MemoryResult<()> {
        let backend = MockBackend::failing(CompletionError::Unavailable("down".to_string()));
        let mut agent = agent(2, backend)?;
        let id = agent.update_memory(&Chunk::new("Anything.")).await;
        assert_eq!(agent.summary_of(id), Some(SUMMARY_FAILED));
        assert_eq!(agent.metrics().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_metrics_grow_once_per_update() -> MemoryResult<()> {
        let mut agent = agent(2, MockBackend::fixed("s"))?;
        for k in 1..=5 {
            agent.update_memory(&Chunk::new("text")).await;
            let metrics = agent.metrics();
            assert_eq!(metrics.processing_times().len(), k);
            assert_eq!(metrics.memory_usage().len(), k);
            assert_eq!(metrics.chunk_sizes().len(), k);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_aggregate_metrics() -> MemoryResult<()> {
        let mut agent = agent(3, MockBackend::fixed("s"))?;
        assert!(agent.get_performance_metrics().is_none());

        for len in [10, 20, 30] {
            agent.update_memory(&Chunk::new("x".repeat(len))).await;
        }

        assert_eq!(agent.metrics().memory_usage(), &[1, 2, 3]);
        assert_eq!(agent.metrics().chunk_sizes(), &[10, 20, 30]);
        assert!(
            agent
                .metrics()
                .processing_times()
                .iter()
                .all(|d| *d >= Duration::ZERO)
        );

        let metrics = agent.get_performance_metrics();
        assert!(metrics.is_some());
        if let Some(metrics) = metrics {
            assert_eq!(metrics.max_memory_usage, 3);
            assert!((metrics.avg_chunk_size - 20.0).abs() < f64::EPSILON);
            let total: f64 = agent
                .metrics()
                .processing_times()
                .iter()
                .map(Duration::as_secs_f64)
                .sum();
            assert!((metrics.avg_processing_time - total / 3.0).abs() < 1e-12);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_without_eviction() -> MemoryResult<()> {
        let mut agent = agent(5, MockBackend::echo_two_sentences())?;
        let ids = agent.process_chunks(&sample_chunks()).await;
        assert_eq!(ids.len(), 3);
        assert_eq!(agent.memory_usage(), 3);
        assert_eq!(agent.store().evictions(), 0);
        assert_eq!(
            agent.summary_of(ids[0]),
            Some("First test chunk. Contains two sentences.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_with_eviction() -> MemoryResult<()> {
        let mut agent = agent(2, MockBackend::echo_two_sentences())?;
        let ids = agent.process_chunks(&sample_chunks()).await;
        assert_eq!(agent.memory_usage(), 2);
        assert!(agent.summary_of(ids[0]).is_none());
        assert!(
            agent
                .store()
                .iter()
                .all(|(_, r)| r.content() != "First test chunk. Contains two sentences.")
        );
        assert_eq!(
            agent.store().latest().map(|(_, r)| r.content()),
            Some("Third test chunk. Final test sentences.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_stay_unique_after_eviction() -> MemoryResult<()> {
        let mut agent = agent(2, MockBackend::fixed("s"))?;
        let ids = agent
            .process_chunks(&[
                Chunk::new("a"),
                Chunk::new("b"),
                Chunk::new("c"),
                Chunk::new("d"),
            ])
            .await;
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["chunk_0", "chunk_1", "chunk_2", "chunk_3"]);
        assert_eq!(agent.store().ids(), vec![ids[2], ids[3]]);
        Ok(())
    }
}
