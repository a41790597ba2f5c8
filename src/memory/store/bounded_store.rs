//! Capacity-bounded memory store with FIFO eviction.
//!
//! Records live in an [`LruCache`] that is only ever read through `peek`
//! and `contains`, so the recency list stays equal to insertion order and
//! `pop_lru` always removes the first-inserted record.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::memory::core::errors::{MemoryError, MemoryResult};
use crate::memory::core::ids::ChunkId;
use crate::memory::core::record::MemoryRecord;

/// Ordered, bounded mapping from [`ChunkId`] to [`MemoryRecord`].
pub struct BoundedMemoryStore {
    records: LruCache<ChunkId, MemoryRecord>,
    next_id: ChunkId,
    last_inserted: Option<ChunkId>,
    evictions: u64,
}

impl BoundedMemoryStore {
    /// Create an empty store holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            records: LruCache::new(capacity),
            next_id: ChunkId::from_sequence(0),
            last_inserted: None,
            evictions: 0,
        }
    }

    /// Create a store from a plain capacity value.
    ///
    /// # Errors
    /// Returns an error if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> MemoryResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            MemoryError::InvalidConfig("memory.capacity must be > 0".to_string())
        })?;
        Ok(Self::new(capacity))
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.cap().get()
    }

    /// Whether the next insertion has to evict first.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity()
    }

    /// Total number of records evicted so far.
    #[must_use]
    pub const fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Remove and return the first-inserted record.
    pub fn evict_oldest(&mut self) -> Option<(ChunkId, MemoryRecord)> {
        let evicted = self.records.pop_lru()?;
        self.evictions += 1;
        if self.last_inserted == Some(evicted.0) {
            self.last_inserted = None;
        }
        debug!(chunk_id = %evicted.0, "Evicted oldest memory record");
        Some(evicted)
    }

    /// Insert a record under the next sequence identifier.
    ///
    /// Evicts the oldest records first if the store is full, so the size
    /// never exceeds the capacity.
    pub fn insert(&mut self, record: MemoryRecord) -> ChunkId {
        while self.is_full() {
            if self.evict_oldest().is_none() {
                break;
            }
        }

        let id = self.next_id;
        self.next_id = id.next();
        let replaced = self.records.put(id, record);
        debug_assert!(replaced.is_none(), "chunk ids are never reused");
        self.last_inserted = Some(id);
        debug!(chunk_id = %id, occupancy = self.records.len(), "Inserted memory record");
        id
    }

    /// Look up a record without changing eviction order.
    #[must_use]
    pub fn get(&self, id: ChunkId) -> Option<&MemoryRecord> {
        self.records.peek(&id)
    }

    /// Whether a record with this identifier is still held.
    #[must_use]
    pub fn contains(&self, id: ChunkId) -> bool {
        self.records.contains(&id)
    }

    /// Most recently inserted record, if it has not been evicted.
    #[must_use]
    pub fn latest(&self) -> Option<(ChunkId, &MemoryRecord)> {
        let id = self.last_inserted?;
        self.records.peek(&id).map(|record| (id, record))
    }

    /// Next record to be evicted.
    #[must_use]
    pub fn oldest(&self) -> Option<(ChunkId, &MemoryRecord)> {
        self.records.peek_lru().map(|(id, record)| (*id, record))
    }

    /// Records in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkId, &MemoryRecord)> + '_ {
        self.records.iter().rev().map(|(id, record)| (*id, record))
    }

    /// Identifiers in insertion order, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<ChunkId> {
        self.iter().map(|(id, _)| id).collect()
    }
}
