//! Cloneable handle for sharing one agent across tasks.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::memory::core::ids::ChunkId;
use crate::memory::core::record::Chunk;
use crate::memory::engine::agent::NoteAgent;
use crate::memory::metrics::log::PerformanceMetrics;

/// Agent behind a single async mutex.
///
/// Every call takes the lock for its whole duration, so updates from
/// different tasks are applied one at a time.
#[derive(Clone)]
pub struct SharedNoteAgent {
    inner: Arc<Mutex<NoteAgent>>,
}

impl SharedNoteAgent {
    /// Wrap an agent.
    #[must_use]
    pub fn new(agent: NoteAgent) -> Self {
        Self {
            inner: Arc::new(Mutex::new(agent)),
        }
    }

    /// See [`NoteAgent::update_memory`].
    pub async fn update_memory(&self, chunk: &Chunk) -> ChunkId {
        self.inner.lock().await.update_memory(chunk).await
    }

    /// See [`NoteAgent::process_chunks`].
    pub async fn process_chunks(&self, chunks: &[Chunk]) -> Vec<ChunkId> {
        self.inner.lock().await.process_chunks(chunks).await
    }

    /// See [`NoteAgent::get_performance_metrics`].
    pub async fn get_performance_metrics(&self) -> Option<PerformanceMetrics> {
        self.inner.lock().await.get_performance_metrics()
    }

    /// See [`NoteAgent::memory_usage`].
    pub async fn memory_usage(&self) -> usize {
        self.inner.lock().await.memory_usage()
    }

    /// Owned copy of the summary stored for `id`.
    pub async fn summary_of(&self, id: ChunkId) -> Option<String> {
        self.inner.lock().await.summary_of(id).map(str::to_string)
    }
}

impl From<NoteAgent> for SharedNoteAgent {
    fn from(agent: NoteAgent) -> Self {
        Self::new(agent)
    }
}
