//! Data models module
//!
//! Contains the latency dataset plotted by the chart and the
//! probe result types.

pub mod dataset;
pub mod probe;

// Re-export commonly used types
pub use dataset::{Dataset, Series, REFERENCE_IO_SIZES, REFERENCE_LATENCIES_US};
pub use probe::{LatencySummary, ProbeRecord, ProbeReport};
