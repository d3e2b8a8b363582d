//! I/O operations module
//!
//! Contains platform-specific file access for the probe, aligned read
//! buffers and filesystem detection.

pub mod buffer;
pub mod disk;
pub mod mounts;

pub use buffer::AlignedBuffer;
pub use disk::{DiskIO, PlatformDiskIO, ProbeFile};
pub use mounts::detect_filesystem;
