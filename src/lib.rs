//! IOLAT - I/O latency probe and chart
//!
//! Renders the median random-read latency of four filesystems across five
//! I/O sizes, and ships the probe used to measure such numbers.

use std::fmt;

pub mod bench;
pub mod chart;
pub mod config;
pub mod io;
pub mod models;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum IolatError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// Dataset shape is inconsistent
    DatasetError(String),
    /// Chart drawing or encoding failed
    RenderError(String),
    /// No font could be loaded for chart text
    FontUnavailable(String),
    /// Latency probe failed mid-run
    ProbeError(String),
    /// Permission denied for file operations
    PermissionDenied(String),
    /// Probe history persistence error
    PersistenceError(String),
}

impl fmt::Display for IolatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IolatError::IoError(err) => write!(f, "I/O error: {}", err),
            IolatError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            IolatError::DatasetError(msg) => write!(f, "Dataset error: {}", msg),
            IolatError::RenderError(msg) => write!(f, "Render error: {}", msg),
            IolatError::FontUnavailable(msg) => write!(f, "Font unavailable: {}", msg),
            IolatError::ProbeError(msg) => write!(f, "Probe error: {}", msg),
            IolatError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            IolatError::PersistenceError(msg) => write!(f, "Probe history error: {}", msg),
        }
    }
}

impl std::error::Error for IolatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IolatError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IolatError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                IolatError::PermissionDenied(format!("Access denied: {}", err))
            }
            _ => IolatError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for IolatError {
    fn from(err: serde_json::Error) -> Self {
        IolatError::PersistenceError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for IolatError {
    fn from(err: toml::de::Error) -> Self {
        IolatError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for IolatError {
    fn from(err: toml::ser::Error) -> Self {
        IolatError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for IOLAT operations
pub type Result<T> = std::result::Result<T, IolatError>;

/// Error handling utilities
pub mod error {
    use super::IolatError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &IolatError) -> String {
        match error {
            IolatError::PermissionDenied(_) => {
                "Permission denied. Check file permissions or pick another location.".to_string()
            }
            IolatError::FontUnavailable(_) => {
                "No usable font found for chart text. Install a TrueType font or set IOLAT_FONT."
                    .to_string()
            }
            IolatError::DatasetError(msg) => {
                format!("Dataset is inconsistent: {}.", msg)
            }
            IolatError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            IolatError::PersistenceError(_) => {
                "Failed to save probe history. Check disk space and permissions.".to_string()
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "iolat";
pub const CONFIG_FILE: &str = "iolat.toml";
pub const HISTORY_FILE: &str = "probes.json";
pub const MAX_HISTORY_ENTRIES: usize = 100;
pub const DEFAULT_CHART_FILE: &str = "io_latency.png";
/// Offset alignment and fill granularity of the probe, in bytes
pub const BLOCK_SIZE: u64 = 4096;
/// Environment variable overriding the chart font file
pub const FONT_ENV: &str = "IOLAT_FONT";
