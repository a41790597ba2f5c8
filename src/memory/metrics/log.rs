//! Append-only performance counters and their aggregates.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Three parallel sequences, one entry each per processed chunk.
#[derive(Clone, Debug, Default)]
pub struct MetricsLog {
    processing_times: Vec<Duration>,
    memory_usage: Vec<usize>,
    chunk_sizes: Vec<usize>,
}

impl MetricsLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            processing_times: Vec::new(),
            memory_usage: Vec::new(),
            chunk_sizes: Vec::new(),
        }
    }

    /// Append one sample to every sequence.
    pub fn record(&mut self, processing_time: Duration, memory_usage: usize, chunk_size: usize) {
        self.processing_times.push(processing_time);
        self.memory_usage.push(memory_usage);
        self.chunk_sizes.push(chunk_size);
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processing_times.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processing_times.is_empty()
    }

    /// Recorded processing durations.
    #[must_use]
    pub fn processing_times(&self) -> &[Duration] {
        &self.processing_times
    }

    /// Recorded occupancy snapshots.
    #[must_use]
    pub fn memory_usage(&self) -> &[usize] {
        &self.memory_usage
    }

    /// Recorded chunk lengths in characters.
    #[must_use]
    pub fn chunk_sizes(&self) -> &[usize] {
        &self.chunk_sizes
    }

    /// Aggregate the log, or `None` when no sample was recorded.
    #[must_use]
    pub fn summary(&self) -> Option<PerformanceMetrics> {
        let max_memory_usage = self.memory_usage.iter().copied().max()?;
        let avg_processing_time = mean(self.processing_times.iter().map(Duration::as_secs_f64))?;
        #[allow(clippy::cast_precision_loss)]
        let avg_chunk_size = mean(self.chunk_sizes.iter().map(|size| *size as f64))?;

        Some(PerformanceMetrics {
            avg_processing_time,
            max_memory_usage,
            avg_chunk_size,
        })
    }
}

/// Aggregates over a [`MetricsLog`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Mean processing time in seconds.
    pub avg_processing_time: f64,
    /// Largest occupancy observed.
    pub max_memory_usage: usize,
    /// Mean chunk length in characters.
    pub avg_chunk_size: f64,
}

impl fmt::Display for PerformanceMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "avg_processing_time: {:.4}", self.avg_processing_time)?;
        writeln!(f, "max_memory_usage: {:.4}", self.max_memory_usage as f64)?;
        write!(f, "avg_chunk_size: {:.4}", self.avg_chunk_size)
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log_has_no_summary() {
        let log = MetricsLog::new();
        assert!(log.is_empty());
        assert!(log.summary().is_none());
    }

    #[test]
    fn test_sequences_grow_together() {
        let mut log = MetricsLog::default();
        for k in 1..=4_usize {
            log.record(Duration::from_millis(50), k, 10);
            assert_eq!(log.len(), k);
            assert_eq!(log.processing_times().len(), log.len());
            assert_eq!(log.memory_usage().len(), log.len());
            assert_eq!(log.chunk_sizes().len(), log.len());
        }
    }

    #[test]
    fn test_summary_aggregates() {
        let mut log = MetricsLog::new();
        log.record(Duration::from_millis(100), 1, 10);
        log.record(Duration::from_millis(200), 2, 20);
        log.record(Duration::from_millis(300), 3, 30);

        let metrics = log.summary();
        assert!(metrics.is_some());
        if let Some(metrics) = metrics {
            assert!((metrics.avg_processing_time - 0.2).abs() < 1e-9);
            assert_eq!(metrics.max_memory_usage, 3);
            assert!((metrics.avg_chunk_size - 20.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let metrics = PerformanceMetrics {
            avg_processing_time: 0.5,
            max_memory_usage: 3,
            avg_chunk_size: 20.0,
        };
        let rendered = metrics.to_string();
        assert!(rendered.contains("avg_processing_time: 0.5000"));
        assert!(rendered.contains("max_memory_usage: 3.0000"));
        assert!(rendered.contains("avg_chunk_size: 20.0000"));
    }
}
