//! Measurement module
//!
//! Test file creation and the random-read latency probe.

pub mod create;
pub mod probe;

// Re-export commonly used types
pub use create::{create_test_file, CreateReport};
pub use probe::{offset_blocks, ProbeConfig, RandomReadProbe};
