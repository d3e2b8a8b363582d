//! Random-read latency probe
//!
//! Times block-aligned seek+read pairs at random offsets of an existing
//! file and reports the median latency in microseconds.

use crate::io::{detect_filesystem, AlignedBuffer, DiskIO, PlatformDiskIO};
use crate::models::{LatencySummary, ProbeReport};
use crate::{IolatError, Result, BLOCK_SIZE};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;

/// Parameters of a single probe run
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub file: PathBuf,
    /// Bytes read per operation
    pub io_size: u64,
    /// Number of timed operations
    pub samples: u64,
    /// Offset alignment in bytes
    pub block_size: u64,
    /// Bypass the page cache where supported
    pub direct: bool,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl ProbeConfig {
    pub fn new(file: impl Into<PathBuf>, io_size: u64, samples: u64) -> Self {
        Self {
            file: file.into(),
            io_size,
            samples,
            block_size: BLOCK_SIZE,
            direct: false,
            seed: None,
        }
    }

    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.io_size == 0 || self.samples == 0 {
            return Err(IolatError::ConfigError(
                "Invalid io_size or samples".to_string(),
            ));
        }
        if self.block_size == 0 || !self.block_size.is_power_of_two() {
            return Err(IolatError::ConfigError(
                "Block size must be a non-zero power of 2".to_string(),
            ));
        }
        if usize::try_from(self.io_size).is_err() {
            return Err(IolatError::ConfigError(format!(
                "io_size too large: {}",
                self.io_size
            )));
        }
        Ok(())
    }
}

/// Number of aligned start blocks whose read fits inside the file.
///
/// The last partial block is included, and a file exactly `io_size` long
/// still yields the single offset 0.
pub fn offset_blocks(file_size: u64, io_size: u64, block_size: u64) -> u64 {
    let max_offset = file_size.saturating_sub(io_size);
    max_offset.div_ceil(block_size).max(1)
}

/// Random-read probe executor
pub struct RandomReadProbe {
    config: ProbeConfig,
    file_size: u64,
    // O_DIRECT only accepts reads that are a whole number of blocks
    direct: bool,
    disk_io: PlatformDiskIO,
}

impl RandomReadProbe {
    /// Validate the configuration against the target file
    pub fn new(config: ProbeConfig) -> Result<Self> {
        config.validate()?;

        let meta = std::fs::metadata(&config.file).map_err(|e| {
            IolatError::ConfigError(format!("Cannot stat {}: {}", config.file.display(), e))
        })?;
        let file_size = meta.len();
        if file_size < config.io_size {
            return Err(IolatError::ConfigError(
                "File size too small for io_size".to_string(),
            ));
        }

        let direct = config.direct && config.io_size % config.block_size == 0;
        if config.direct && !direct {
            log::warn!(
                "io_size {} is not a multiple of {} bytes, using buffered reads",
                config.io_size,
                config.block_size
            );
        }

        Ok(Self {
            config,
            file_size,
            direct,
            disk_io: PlatformDiskIO::new(),
        })
    }

    /// Execute all samples and summarise them
    pub fn run(&self) -> Result<ProbeReport> {
        let (samples, direct) = self.sample()?;
        let latency = LatencySummary::from_samples(&samples);
        log::debug!(
            "probe {} io_size={} median={:.2}us min={:.2}us max={:.2}us",
            self.config.file.display(),
            self.config.io_size,
            latency.median_us,
            latency.min_us,
            latency.max_us
        );

        Ok(ProbeReport {
            file: self.config.file.clone(),
            file_size: self.file_size,
            io_size: self.config.io_size,
            filesystem: detect_filesystem(&self.config.file),
            direct,
            latency,
        })
    }

    /// Raw per-operation latencies in microseconds, in execution order
    pub fn collect_samples(&self) -> Result<Vec<f64>> {
        Ok(self.sample()?.0)
    }

    fn sample(&self) -> Result<(Vec<f64>, bool)> {
        let mut file = self
            .disk_io
            .open_for_probe(&self.config.file, self.direct)
            .map_err(|e| IolatError::ProbeError(format!("Open failed: {}", e)))?;
        let mut buffer =
            AlignedBuffer::new(self.config.io_size as usize, self.config.block_size as usize)?;

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let num_blocks = offset_blocks(self.file_size, self.config.io_size, self.config.block_size);
        log::info!(
            "probing {} with {} reads of {} bytes over {} offsets{}",
            self.config.file.display(),
            self.config.samples,
            self.config.io_size,
            num_blocks,
            if file.is_direct() { " (direct)" } else { "" }
        );

        let mut latencies = Vec::with_capacity(self.config.samples as usize);
        for _ in 0..self.config.samples {
            let offset = rng.gen_range(0..num_blocks) * self.config.block_size;

            let op_start = Instant::now();
            file.seek_to(offset)
                .map_err(|e| IolatError::ProbeError(format!("Seek failed: {}", e)))?;
            file.read_block(buffer.as_mut_slice())
                .map_err(|e| IolatError::ProbeError(format!("Read failed: {}", e)))?;
            latencies.push(op_start.elapsed().as_secs_f64() * 1e6);
        }

        Ok((latencies, file.is_direct()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn data_file(dir: &std::path::Path, len: usize) -> PathBuf {
        let path = dir.join("probe.dat");
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_offset_blocks() {
        assert_eq!(offset_blocks(16384, 4096, 4096), 3);
        // partial trailing block still counts
        assert_eq!(offset_blocks(16384 + 100, 4096, 4096), 4);
        assert_eq!(offset_blocks(4096, 4096, 4096), 1);
        assert_eq!(offset_blocks(5000, 4096, 4096), 1);
    }

    #[test]
    fn test_offsets_stay_in_bounds() {
        for (file_size, io_size) in [(16384u64, 4096u64), (20000, 8192), (65536, 65536)] {
            let blocks = offset_blocks(file_size, io_size, 4096);
            let last = (blocks - 1) * 4096;
            assert!(last + io_size <= file_size);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 8192);
        assert!(RandomReadProbe::new(ProbeConfig::new(&path, 0, 10)).is_err());
        assert!(RandomReadProbe::new(ProbeConfig::new(&path, 4096, 0)).is_err());
        assert!(RandomReadProbe::new(ProbeConfig::new(&path, 4096, 1).with_block_size(1000)).is_err());
    }

    #[test]
    fn test_rejects_small_file() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 4096);
        let err = match RandomReadProbe::new(ProbeConfig::new(&path, 8192, 10)) {
            Err(e) => e,
            Ok(_) => panic!("expected small-file rejection"),
        };
        assert!(err.to_string().contains("File size too small for io_size"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = RandomReadProbe::new(ProbeConfig::new(dir.path().join("nope"), 4096, 1));
        assert!(matches!(result, Err(IolatError::ConfigError(_))));
    }

    #[test]
    fn test_collects_requested_samples() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 64 * 1024);
        let probe = RandomReadProbe::new(ProbeConfig::new(&path, 8192, 25).with_seed(7)).unwrap();
        let samples = probe.collect_samples().unwrap();
        assert_eq!(samples.len(), 25);
        assert!(samples.iter().all(|&s| s >= 0.0 && s.is_finite()));
    }

    #[test]
    fn test_report_fields() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 32 * 1024);
        let probe = RandomReadProbe::new(ProbeConfig::new(&path, 4096, 11).with_seed(1)).unwrap();
        let report = probe.run().unwrap();
        assert_eq!(report.io_size, 4096);
        assert_eq!(report.file_size, 32 * 1024);
        assert_eq!(report.latency.samples, 11);
        assert!(report.latency.min_us <= report.latency.median_us);
        assert!(report.latency.median_us <= report.latency.max_us);
    }

    #[test]
    fn test_direct_unaligned_io_size_reads_buffered() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 64 * 1024);
        let probe = RandomReadProbe::new(
            ProbeConfig::new(&path, 5000, 5).with_direct(true).with_seed(3),
        )
        .unwrap();
        let report = probe.run().unwrap();
        assert_eq!(report.latency.samples, 5);
        assert!(!report.direct);
    }

    #[test]
    fn test_exact_size_file() {
        let dir = tempdir().unwrap();
        let path = data_file(dir.path(), 4096);
        let probe = RandomReadProbe::new(ProbeConfig::new(&path, 4096, 5)).unwrap();
        assert_eq!(probe.collect_samples().unwrap().len(), 5);
    }
}
