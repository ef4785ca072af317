use alloc::format;

use crate::error::ShockError;

/// Caps on decoded bitmap size, checked before the RGBA buffer is
/// allocated. All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum RGBA output bytes (four per pixel).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Validate a bitmap's geometry and the output allocation it implies.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), ShockError> {
        if let Some(max) = self.max_width {
            if u64::from(width) > max {
                return Err(ShockError::LimitExceeded(format!(
                    "width {width} exceeds limit {max}"
                )));
            }
        }
        if let Some(max) = self.max_height {
            if u64::from(height) > max {
                return Err(ShockError::LimitExceeded(format!(
                    "height {height} exceeds limit {max}"
                )));
            }
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels {
            if pixels > max {
                return Err(ShockError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max}"
                )));
            }
        }
        if let Some(max) = self.max_memory_bytes {
            let bytes = pixels * 4;
            if bytes > max {
                return Err(ShockError::LimitExceeded(format!(
                    "output of {bytes} bytes exceeds memory limit {max}"
                )));
            }
        }
        Ok(())
    }
}
