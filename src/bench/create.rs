//! Test file creation
//!
//! Fills a file with zeroed blocks and syncs it so later probes read
//! allocated extents.

use crate::io::{DiskIO, PlatformDiskIO};
use crate::util::units::format_bytes;
use crate::{IolatError, Result, BLOCK_SIZE};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of a test file fill
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub path: PathBuf,
    pub blocks: u64,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Create `path` holding `blocks` zeroed blocks of BLOCK_SIZE bytes, then fsync it
pub fn create_test_file(path: &Path, blocks: u64) -> Result<CreateReport> {
    create_test_file_with(path, blocks, ProgressDrawTarget::stderr())
}

pub(crate) fn create_test_file_with(
    path: &Path,
    blocks: u64,
    draw_target: ProgressDrawTarget,
) -> Result<CreateReport> {
    if blocks == 0 {
        return Err(IolatError::ConfigError("Invalid file size".to_string()));
    }
    let total = blocks.checked_mul(BLOCK_SIZE).ok_or_else(|| {
        IolatError::ConfigError(format!("File size overflows: {} blocks", blocks))
    })?;

    log::info!(
        "creating {} ({} blocks, {})",
        path.display(),
        blocks,
        format_bytes(total)
    );

    let start = Instant::now();
    let mut file = PlatformDiskIO::new().create_for_fill(path)?;
    let buffer = vec![0u8; BLOCK_SIZE as usize];

    let pb = ProgressBar::with_draw_target(Some(total), draw_target);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} {bytes}/{total_bytes} ({eta}) {msg}")
    {
        pb.set_style(style);
    }

    for _ in 0..blocks {
        file.write_block(&buffer)
            .map_err(|e| IolatError::ProbeError(format!("Write failed: {}", e)))?;
        pb.inc(BLOCK_SIZE);
    }

    pb.set_message("syncing");
    file.sync_all()
        .map_err(|e| IolatError::ProbeError(format!("Sync failed: {}", e)))?;
    pb.finish_and_clear();

    let elapsed = start.elapsed();
    log::debug!("filled {} in {:?}", path.display(), elapsed);

    Ok(CreateReport {
        path: path.to_path_buf(),
        blocks,
        bytes_written: total,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_zeroed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.dat");
        let report = create_test_file_with(&path, 3, ProgressDrawTarget::hidden()).unwrap();

        assert_eq!(report.bytes_written, 3 * BLOCK_SIZE);
        let content = std::fs::read(&path).unwrap();
        assert_eq!(content.len() as u64, 3 * BLOCK_SIZE);
        assert!(content.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_truncates_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.dat");
        std::fs::write(&path, vec![1u8; 5 * BLOCK_SIZE as usize]).unwrap();

        create_test_file_with(&path, 1, ProgressDrawTarget::hidden()).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), BLOCK_SIZE);
    }

    #[test]
    fn test_zero_blocks_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.dat");
        let err = create_test_file_with(&path, 0, ProgressDrawTarget::hidden()).unwrap_err();
        assert!(err.to_string().contains("Invalid file size"));
        assert!(!path.exists());
    }
}
