//! Chunk input and stored record types.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of input text submitted for summarization and storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Raw chunk text.
    pub text: String,
}

impl Chunk {
    /// Create a chunk from any string-like value.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<&str> for Chunk {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Chunk {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

/// A stored chunk with its summary.
///
/// Records are built once at insertion and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct MemoryRecord {
    content: String,
    summary: String,
    timestamp: Instant,
    created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Build a record stamped with the current time.
    #[must_use]
    pub fn new(content: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            summary: summary.into(),
            timestamp: Instant::now(),
            created_at: Utc::now(),
        }
    }

    /// Original chunk text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Summary produced at insertion.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Monotonic insertion instant.
    #[must_use]
    pub const fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Wall-clock insertion time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_from_json() -> Result<(), serde_json::Error> {
        let chunk: Chunk = serde_json::from_str(r#"{"text":"héllo"}"#)?;
        assert_eq!(chunk.text, "héllo");
        assert_eq!(chunk.char_len(), 5);
        Ok(())
    }

    #[test]
    fn test_records_are_time_ordered() {
        let first = MemoryRecord::new("a", "sa");
        let second = MemoryRecord::new("b", "sb");
        assert!(second.timestamp() >= first.timestamp());
        assert_eq!(first.content(), "a");
        assert_eq!(first.summary(), "sa");
    }

    #[test]
    fn test_created_at_is_wall_clock_insertion_time() {
        let before = Utc::now();
        let record = MemoryRecord::new("a", "sa");
        let after = Utc::now();
        assert!(record.created_at() >= before);
        assert!(record.created_at() <= after);
    }
}
