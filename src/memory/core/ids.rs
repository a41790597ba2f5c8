// File: src/memory/core/ids.rs

//! Identifier types for the note memory.
//!
//! Chunk identifiers come from a per-store sequence counter and are
//! rendered as `chunk_<n>`. They never depend on how many records the
//! store currently holds, so an identifier is never reused after eviction.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Textual prefix of a rendered [`ChunkId`].
const CHUNK_PREFIX: &str = "chunk_";

/// Identifier of a stored chunk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ChunkId(u64);

impl ChunkId {
    /// Wrap a raw sequence number.
    #[inline]
    #[must_use]
    pub const fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Underlying sequence number.
    #[inline]
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }

    /// Identifier that follows this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CHUNK_PREFIX}{}", self.0)
    }
}

impl From<ChunkId> for u64 {
    #[inline]
    fn from(value: ChunkId) -> Self {
        value.0
    }
}

/// Errors returned when parsing a [`ChunkId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkIdError {
    /// The input does not start with `chunk_`.
    MissingPrefix,
    /// The suffix is not a base-10 sequence number.
    InvalidSequence(String),
}

impl fmt::Display for ChunkIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix => write!(f, "chunk id must start with {CHUNK_PREFIX:?}"),
            Self::InvalidSequence(raw) => write!(f, "invalid chunk sequence: {raw:?}"),
        }
    }
}

impl std::error::Error for ChunkIdError {}

impl FromStr for ChunkId {
    type Err = ChunkIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(CHUNK_PREFIX)
            .ok_or(ChunkIdError::MissingPrefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ChunkIdError::InvalidSequence(digits.to_string()));
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ChunkIdError::InvalidSequence(digits.to_string()))
    }
}
