use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Cross-platform file operations used by the probe
pub trait DiskIO {
    /// Create (or truncate) a file for writing the probe data set
    fn create_for_fill(&self, path: &Path) -> io::Result<Box<dyn ProbeFile>>;

    /// Open a file for timed reads, optionally bypassing the page cache
    fn open_for_probe(&self, path: &Path, direct: bool) -> io::Result<Box<dyn ProbeFile>>;
}

/// File handle used for filling and probing
pub trait ProbeFile: Send {
    fn write_block(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Read exactly `buf.len()` bytes at the current position
    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()>;

    fn seek_to(&mut self, offset: u64) -> io::Result<u64>;

    /// Force synchronization to disk
    fn sync_all(&mut self) -> io::Result<()>;

    /// Whether the handle was opened with the page cache bypassed
    fn is_direct(&self) -> bool;
}

/// Plain `std::fs::File` backed handle
struct StdProbeFile {
    file: File,
    direct: bool,
}

impl StdProbeFile {
    fn new(file: File, direct: bool) -> Self {
        Self { file, direct }
    }
}

impl ProbeFile for StdProbeFile {
    fn write_block(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.file.read_exact(buf)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(offset))
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn is_direct(&self) -> bool {
        self.direct
    }
}

/// Platform-specific disk I/O implementation
#[derive(Clone, Default)]
pub struct PlatformDiskIO;

impl PlatformDiskIO {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use std::os::unix::fs::OpenOptionsExt;

    // rw-rw-r--
    const FILL_MODE: u32 = 0o664;

    impl DiskIO for PlatformDiskIO {
        fn create_for_fill(&self, path: &Path) -> io::Result<Box<dyn ProbeFile>> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(FILL_MODE)
                .open(path)?;
            Ok(Box::new(StdProbeFile::new(file, false)))
        }

        fn open_for_probe(&self, path: &Path, direct: bool) -> io::Result<Box<dyn ProbeFile>> {
            if direct {
                // Try O_DIRECT first, fall back to a buffered handle
                match OpenOptions::new()
                    .read(true)
                    .custom_flags(libc::O_DIRECT)
                    .open(path)
                {
                    Ok(file) => return Ok(Box::new(StdProbeFile::new(file, true))),
                    Err(e) => {
                        log::warn!(
                            "O_DIRECT unavailable for {} ({}), using buffered reads",
                            path.display(),
                            e
                        );
                    }
                }
            }

            let file = OpenOptions::new().read(true).open(path)?;
            Ok(Box::new(StdProbeFile::new(file, false)))
        }
    }
}

#[cfg(not(unix))]
mod portable_impl {
    use super::*;

    impl DiskIO for PlatformDiskIO {
        fn create_for_fill(&self, path: &Path) -> io::Result<Box<dyn ProbeFile>> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            Ok(Box::new(StdProbeFile::new(file, false)))
        }

        fn open_for_probe(&self, path: &Path, direct: bool) -> io::Result<Box<dyn ProbeFile>> {
            if direct {
                log::warn!("direct I/O is not supported on this platform, using buffered reads");
            }
            let file = OpenOptions::new().read(true).open(path)?;
            Ok(Box::new(StdProbeFile::new(file, false)))
        }
    }
}
