//! Configuration management module
//!
//! Handles loading, saving, and validation of chart and probe settings.

use crate::{IolatError, Result, APP_NAME, BLOCK_SIZE, CONFIG_FILE, DEFAULT_CHART_FILE, FONT_ENV};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod persistence;

/// Top-level configuration file layout
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct IolatConfig {
    pub chart: ChartConfig,
    pub probe: ProbeDefaults,
}

/// Chart output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Output image path; the extension selects PNG or SVG
    pub output: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// TrueType font used for chart text; searched for when unset
    pub font_path: Option<PathBuf>,
}

/// Defaults applied to `probe` runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeDefaults {
    /// Offset alignment of random reads, in bytes
    pub block_size: u64,
    /// Bypass the page cache with O_DIRECT where supported
    pub direct: bool,
    /// Append every probe to the probe history
    pub record: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_CHART_FILE),
            // 6.4in x 4.8in at 100 dpi
            width: 640,
            height: 480,
            font_path: None,
        }
    }
}

impl Default for ProbeDefaults {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            direct: false,
            record: false,
        }
    }
}

impl ChartConfig {
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Apply the font override from the environment, if set
    pub fn apply_env(mut self) -> Self {
        if let Some(font) = std::env::var_os(FONT_ENV) {
            if !font.is_empty() {
                self.font_path = Some(PathBuf::from(font));
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(IolatError::ConfigError(
                "Chart output path must not be empty".to_string(),
            ));
        }

        const MIN_DIM: u32 = 200;
        const MAX_DIM: u32 = 8192;
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIM..=MAX_DIM).contains(&value) {
                return Err(IolatError::ConfigError(format!(
                    "Chart {} must be between {} and {} pixels, got {}",
                    name, MIN_DIM, MAX_DIM, value
                )));
            }
        }

        Ok(())
    }
}

impl ProbeDefaults {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || !self.block_size.is_power_of_two() {
            return Err(IolatError::ConfigError(
                "Probe block size must be a non-zero power of 2".to_string(),
            ));
        }
        Ok(())
    }
}

impl IolatConfig {
    pub fn validate(&self) -> Result<()> {
        self.chart.validate()?;
        self.probe.validate()
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            IolatError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            IolatError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;
        log::debug!("loaded config from {}", config_path.display());

        Ok(config)
    }

    /// Load configuration without failing.
    ///
    /// An unreadable file falls back to defaults, and a section that fails
    /// validation is replaced by its defaults so the other section still
    /// applies. Problems are logged as warnings.
    pub fn load_or_default(config_path: &Path) -> Self {
        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Self::default();
        }

        let parsed = fs::read_to_string(config_path)
            .map_err(IolatError::from)
            .and_then(|content| toml::from_str::<Self>(&content).map_err(IolatError::from));
        let mut config = match parsed {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}: {}, using default settings", config_path.display(), e);
                return Self::default();
            }
        };

        if let Err(e) = config.chart.validate() {
            log::warn!("{}, using default [chart] settings", e);
            config.chart = ChartConfig::default();
        }
        if let Err(e) = config.probe.validate() {
            log::warn!("{}, using default [probe] settings", e);
            config.probe = ProbeDefaults::default();
        }

        config
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                IolatError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            IolatError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/iolat/iolat.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            IolatError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = IolatConfig::default();
        assert_eq!(config.chart.output, PathBuf::from("io_latency.png"));
        assert_eq!(config.probe.block_size, 4096);
        assert!(!config.probe.direct);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_file() {
        let config: IolatConfig = toml::from_str("[chart]\nwidth = 1024\n").unwrap();
        assert_eq!(config.chart.width, 1024);
        assert_eq!(config.chart.height, 480);
        assert_eq!(config.probe, ProbeDefaults::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = IolatConfig::default();
        config.chart = config.chart.with_output("out.svg").with_size(800, 600);
        config.probe.record = true;
        config.save_to(&path).unwrap();

        let loaded = IolatConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let loaded = IolatConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, IolatConfig::default());
    }

    #[test]
    fn test_validation() {
        let bad = ChartConfig::default().with_size(10, 480);
        assert!(matches!(bad.validate(), Err(IolatError::ConfigError(_))));

        let probe = ProbeDefaults {
            block_size: 3000,
            ..ProbeDefaults::default()
        };
        assert!(probe.validate().is_err());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[chart]\nwidth = \"wide\"\n").unwrap();
        assert!(IolatConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_config_file_path() {
        let path = IolatConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("iolat.toml"));
    }

    #[test]
    fn test_lenient_load_keeps_valid_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("iolat.toml");
        fs::write(&path, "[chart]\nwidth = 1024\n\n[probe]\nblock_size = 3000\n").unwrap();

        assert!(IolatConfig::load_from(&path).is_err());
        let config = IolatConfig::load_or_default(&path);
        assert_eq!(config.chart.width, 1024);
        assert_eq!(config.probe, ProbeDefaults::default());
    }

    #[test]
    fn test_lenient_load_bad_chart_and_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("iolat.toml");
        fs::write(&path, "[chart]\nwidth = 10\n\n[probe]\ndirect = true\n").unwrap();
        let config = IolatConfig::load_or_default(&path);
        assert_eq!(config.chart, ChartConfig::default());
        assert!(config.probe.direct);

        fs::write(&path, "this is = = not toml").unwrap();
        let config = IolatConfig::load_or_default(&path);
        assert_eq!(config.chart, ChartConfig::default());
        assert_eq!(config.probe, ProbeDefaults::default());
    }
}
