//! Latency dataset model
//!
//! A shared I/O-size axis paired by position with one median latency
//! sequence per filesystem.

use crate::{IolatError, Result};
use serde::{Deserialize, Serialize};

/// I/O sizes of the reference measurements, in bytes
pub const REFERENCE_IO_SIZES: [u64; 5] = [4096, 8192, 16384, 32768, 65536];

/// Median random-read latencies (microseconds) per filesystem, in plotting order
pub const REFERENCE_LATENCIES_US: [(&str, [f64; 5]); 4] = [
    ("FAT32", [5681.04, 5710.27, 5809.77, 6013.31, 6807.38]),
    ("ext4", [6874.37, 6797.77, 7113.19, 7253.12, 7454.21]),
    ("xfs", [5752.94, 5830.60, 5958.48, 5896.05, 6248.07]),
    ("f2fs", [7402.58, 7333.08, 7454.35, 8157.18, 8391.97]),
];

/// One filesystem's latency values against the shared I/O-size axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Filesystem label shown in the legend
    pub filesystem: String,
    /// Median latency per I/O size, in microseconds
    pub median_latency_us: Vec<f64>,
}

impl Series {
    pub fn new(filesystem: impl Into<String>, median_latency_us: Vec<f64>) -> Self {
        Self {
            filesystem: filesystem.into(),
            median_latency_us,
        }
    }

    pub fn len(&self) -> usize {
        self.median_latency_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.median_latency_us.is_empty()
    }
}

/// Positionally aligned latency dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    io_sizes: Vec<u64>,
    series: Vec<Series>,
}

impl Dataset {
    /// Build a dataset, rejecting any series whose length differs from the axis
    pub fn new(io_sizes: Vec<u64>, series: Vec<Series>) -> Result<Self> {
        if io_sizes.is_empty() {
            return Err(IolatError::DatasetError(
                "I/O size axis must not be empty".to_string(),
            ));
        }

        for s in &series {
            if s.len() != io_sizes.len() {
                return Err(IolatError::DatasetError(format!(
                    "series '{}' has {} values but the I/O size axis has {}",
                    s.filesystem,
                    s.len(),
                    io_sizes.len()
                )));
            }
            if s.median_latency_us.iter().any(|v| !v.is_finite()) {
                return Err(IolatError::DatasetError(format!(
                    "series '{}' contains a non-finite latency",
                    s.filesystem
                )));
            }
        }

        Ok(Self { io_sizes, series })
    }

    /// The FAT32/ext4/xfs/f2fs reference measurements
    pub fn reference() -> Self {
        let series = REFERENCE_LATENCIES_US
            .iter()
            .map(|(fs, values)| Series::new(*fs, values.to_vec()))
            .collect();
        Self {
            io_sizes: REFERENCE_IO_SIZES.to_vec(),
            series,
        }
    }

    pub fn io_sizes(&self) -> &[u64] {
        &self.io_sizes
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Find a series by its filesystem label
    pub fn series_for(&self, filesystem: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.filesystem == filesystem)
    }

    /// Latency of `filesystem` at `io_size`, if both exist
    pub fn latency_at(&self, filesystem: &str, io_size: u64) -> Option<f64> {
        let idx = self.io_sizes.iter().position(|&s| s == io_size)?;
        self.series_for(filesystem)
            .map(|s| s.median_latency_us[idx])
    }

    /// Swap the plotting order of two series
    pub fn swap_series(&mut self, a: usize, b: usize) {
        self.series.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_shape() {
        let data = Dataset::reference();
        assert_eq!(data.io_sizes(), &[4096, 8192, 16384, 32768, 65536]);
        assert_eq!(data.series().len(), 4);
        for s in data.series() {
            assert_eq!(s.len(), data.io_sizes().len());
        }
        let labels: Vec<_> = data.series().iter().map(|s| s.filesystem.as_str()).collect();
        assert_eq!(labels, vec!["FAT32", "ext4", "xfs", "f2fs"]);
    }

    #[test]
    fn test_reference_values() {
        let data = Dataset::reference();
        assert_eq!(data.latency_at("FAT32", 65536), Some(6807.38));
        assert_eq!(data.latency_at("xfs", 16384), Some(5958.48));
        assert_eq!(data.latency_at("f2fs", 4096), Some(7402.58));
        assert_eq!(data.latency_at("ntfs", 4096), None);
        assert_eq!(data.latency_at("ext4", 1234), None);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = Dataset::new(
            vec![4096, 8192],
            vec![Series::new("ext4", vec![1.0, 2.0, 3.0])],
        )
        .unwrap_err();
        assert!(matches!(err, IolatError::DatasetError(_)));
        assert!(err.to_string().contains("ext4"));
    }

    #[test]
    fn test_rejects_empty_axis_and_nan() {
        assert!(Dataset::new(Vec::new(), Vec::new()).is_err());
        assert!(Dataset::new(vec![4096], vec![Series::new("xfs", vec![f64::NAN])]).is_err());
    }

    #[test]
    fn test_swap_keeps_pairing() {
        let mut data = Dataset::reference();
        data.swap_series(0, 3);
        assert_eq!(data.series()[0].filesystem, "f2fs");
        assert_eq!(data.latency_at("FAT32", 65536), Some(6807.38));
        assert_eq!(data.latency_at("f2fs", 65536), Some(8391.97));
    }
}
