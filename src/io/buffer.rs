use crate::{IolatError, Result};

/// Heap buffer whose usable region starts at an aligned address.
///
/// O_DIRECT reads require the destination to be aligned to the logical
/// block size, so the backing allocation is over-sized by `align` bytes and
/// the window is shifted forward to the first aligned address.
pub struct AlignedBuffer {
    raw: Vec<u8>,
    offset: usize,
    len: usize,
}

impl AlignedBuffer {
    pub fn new(len: usize, align: usize) -> Result<Self> {
        if len == 0 {
            return Err(IolatError::ConfigError(
                "Buffer size must be greater than 0".to_string(),
            ));
        }
        if align == 0 || !align.is_power_of_two() {
            return Err(IolatError::ConfigError(
                "Buffer alignment must be a non-zero power of 2".to_string(),
            ));
        }

        let raw = vec![0u8; len + align];
        let offset = raw.as_ptr().align_offset(align);
        if offset >= align {
            return Err(IolatError::ConfigError(format!(
                "Unable to align buffer to {} bytes",
                align
            )));
        }

        Ok(Self { raw, offset, len })
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.raw[self.offset..self.offset + self.len]
    }
}
