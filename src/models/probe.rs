//! Probe result data models
//!
//! Latency summaries of a random-read probe and the timestamped record
//! kept in the probe history.

use crate::util::units::{format_bytes, format_latency_us};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of latency samples, all values in microseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LatencySummary {
    pub samples: usize,
    pub median_us: f64,
    pub min_us: f64,
    pub max_us: f64,
    pub mean_us: f64,
}

impl LatencySummary {
    /// Summarise raw samples; the median of an even count is the mean of the two middle values
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let median_us = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Self {
            samples: n,
            median_us,
            min_us: sorted[0],
            max_us: sorted[n - 1],
            mean_us: sorted.iter().sum::<f64>() / n as f64,
        }
    }
}

/// Outcome of one probe run against one file at one I/O size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub file: PathBuf,
    pub file_size: u64,
    pub io_size: u64,
    /// Filesystem type of the probed file, when detectable
    pub filesystem: Option<String>,
    /// Whether reads bypassed the page cache
    pub direct: bool,
    pub latency: LatencySummary,
}

/// Probe report as stored in the probe history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub timestamp: DateTime<Utc>,
    pub os: String,
    #[serde(flatten)]
    pub report: ProbeReport,
}

impl ProbeRecord {
    pub fn new(report: ProbeReport) -> Self {
        Self {
            timestamp: Utc::now(),
            os: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            report,
        }
    }

    /// One-line summary for history listings
    pub fn summary(&self) -> String {
        format!(
            "{} - {} - {} - {} median over {} samples",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.report.filesystem.as_deref().unwrap_or("unknown"),
            format_bytes(self.report.io_size),
            format_latency_us(self.report.latency.median_us),
            self.report.latency.samples
        )
    }
}
