//! Processing metrics for the note agent.

pub mod log;

pub use self::log::{MetricsLog, PerformanceMetrics};
