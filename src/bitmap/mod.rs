//! Bitmap member decoding: metadata record, run-length expansion and
//! per-depth pixel reconstruction.

pub mod rle;
mod unpack;

use alloc::format;
use alloc::vec::Vec;

use enough::Stop;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;
use crate::limits::Limits;
use crate::palette::Palette;

/// Bitmap geometry decoded from a member's type-specific blob.
///
/// The record is big-endian with fixed offsets; several historical
/// lengths exist and absent trailing fields default to neutral values
/// rather than failing. Anything under the 8-byte bounding box is
/// malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapInfo {
    pub width: u16,
    pub height: u16,
    /// Bits per pixel. Validated against {1, 4, 8, 16, 32} at unpack
    /// time, not here, so callers can report the member before skipping.
    pub bit_depth: u16,
    /// Palette reference; resolves through the movie's palette table,
    /// falling back to the built-in system palette.
    pub palette_id: u8,
    /// Authoring-tool anchor offset, not pixel data.
    pub reg_x: i16,
    pub reg_y: i16,
}

impl BitmapInfo {
    /// Parse a member's specific-data blob.
    ///
    /// Layout: bounding box (top, left, bottom, right as 16-bit fields,
    /// width = right - left, height = bottom - top), then, when the blob
    /// is long enough: 16-bit bit depth (legacy short records omit it,
    /// meaning 1), 8-bit palette id, and a pair of signed registration
    /// coordinates.
    pub fn parse(specific: &[u8]) -> Result<BitmapInfo, ShockError> {
        if specific.len() < 8 {
            return Err(ShockError::InvalidHeader(format!(
                "bitmap record of {} bytes, need at least 8",
                specific.len()
            )));
        }
        let mut c = Cursor::new(specific, Endian::Big);
        let top = c.read_i16()?;
        let left = c.read_i16()?;
        let bottom = c.read_i16()?;
        let right = c.read_i16()?;
        let width = (right as i32 - left as i32).max(0) as u16;
        let height = (bottom as i32 - top as i32).max(0) as u16;

        let bit_depth = if specific.len() >= 10 { c.read_u16()? } else { 1 };
        let palette_id = if specific.len() >= 11 { c.read_u8()? } else { 0 };
        let (reg_x, reg_y) = if specific.len() >= 15 {
            (c.read_i16()?, c.read_i16()?)
        } else {
            (0, 0)
        };

        Ok(BitmapInfo {
            width,
            height,
            bit_depth,
            palette_id,
            reg_x,
            reg_y,
        })
    }

    /// Bytes per decompressed pixel row for this bitmap.
    pub fn scan_width(&self) -> usize {
        scan_width(self.width, self.bit_depth)
    }

    /// Exact decompressed byte length the pixel data must expand to.
    pub fn expected_data_len(&self) -> usize {
        self.scan_width() * self.height as usize
    }
}

/// Bytes needed to hold `width` pixels at `depth` bits each, rounded up
/// to an even byte count (the source format packs scanlines on word
/// boundaries). At depths 16 and 32 this is the per-channel-byte row
/// width; those rows store channel-separated planes, not interleaved
/// pixels.
pub fn scan_width(width: u16, depth: u16) -> usize {
    let bits = width as usize * depth as usize;
    (bits.div_ceil(8) + 1) & !1
}

/// Final pixel output: a width x height RGBA buffer.
#[derive(Clone, Debug)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl DecodedBitmap {
    pub(crate) fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// Raw RGBA bytes, row-major, four bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.data
    }

    /// Typed pixel view.
    #[cfg(feature = "rgb")]
    pub fn as_rgba(&self) -> &[rgb::RGBA8] {
        use rgb::AsPixels as _;
        self.data.as_pixels()
    }

    /// Zero-copy 2D view over the pixel buffer.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGBA8> {
        imgref::ImgRef::new(self.as_rgba(), self.width as usize, self.height as usize)
    }
}

/// Decode one bitmap member's pixel chunk into RGBA.
///
/// Expands the run-length data to exactly the expected length (a payload
/// already at that length is stored uncompressed and used as-is), then
/// reconstructs pixels per the record's bit depth.
pub fn decode_bitmap_data(
    bitd: &[u8],
    info: &BitmapInfo,
    palette: &Palette,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodedBitmap, ShockError> {
    check_limits(limits, info)?;
    stop.check()?;

    let expected = info.expected_data_len();
    if bitd.len() == expected {
        unpack::unpack(bitd, info, palette, stop)
    } else {
        let data = rle::decompress(bitd, expected);
        unpack::unpack(&data, info, palette, stop)
    }
}

fn check_limits(limits: Option<&Limits>, info: &BitmapInfo) -> Result<(), ShockError> {
    let (w, h) = (info.width as u32, info.height as u32);
    // The output buffer is indexed with usize; guard the multiplication
    // on 32-bit targets independently of any configured limits.
    (w as usize)
        .checked_mul(h as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or(ShockError::DimensionsTooLarge {
            width: w,
            height: h,
        })?;
    if let Some(limits) = limits {
        limits.check(w, h)?;
    }
    Ok(())
}
