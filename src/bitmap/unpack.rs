//! Per-depth pixel reconstruction.
//!
//! Depths 1/4/8 are palette-indexed with MSB-first sub-byte packing.
//! Depth 16 rows are channel-separated: all high bytes left to right,
//! then all low bytes, each pair forming a packed 1-5-5-5 color. Depth
//! 32 rows are fully planar: alpha, red, green and blue planes in
//! sequence. Source positions past the end of the buffer leave the
//! pixel fully transparent; they are never read.

use alloc::vec;

use enough::Stop;

use super::{BitmapInfo, DecodedBitmap};
use crate::error::ShockError;
use crate::palette::Palette;

/// Convert decompressed scanline bytes into an RGBA buffer.
///
/// Pure transform; the only error is a bit depth outside {1, 4, 8, 16,
/// 32}, which callers treat as skip-this-member.
pub(crate) fn unpack(
    data: &[u8],
    info: &BitmapInfo,
    palette: &Palette,
    stop: &dyn Stop,
) -> Result<DecodedBitmap, ShockError> {
    let w = info.width as usize;
    let h = info.height as usize;
    let scan = info.scan_width();
    let mut out = vec![0u8; w * h * 4];

    match info.bit_depth {
        depth @ (1 | 4 | 8) => {
            for y in 0..h {
                if y % 16 == 0 {
                    stop.check()?;
                }
                let row = y * scan;
                let out_row = &mut out[y * w * 4..(y + 1) * w * 4];
                for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
                    let index = match depth {
                        1 => data.get(row + x / 8).map(|&b| (b >> (7 - x % 8)) & 0x01),
                        4 => data.get(row + x / 2).map(|&b| (b >> (4 * (1 - x % 2))) & 0x0F),
                        _ => data.get(row + x).copied(),
                    };
                    let Some(index) = index else { continue };
                    // An index past the palette is opaque black, not an
                    // error.
                    let (r, g, b) = palette
                        .colors
                        .get(index as usize)
                        .copied()
                        .unwrap_or((0, 0, 0));
                    px.copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
        16 => {
            for y in 0..h {
                if y % 16 == 0 {
                    stop.check()?;
                }
                let row = y * scan;
                let out_row = &mut out[y * w * 4..(y + 1) * w * 4];
                for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
                    let (Some(&hi), Some(&lo)) = (data.get(row + x), data.get(row + w + x))
                    else {
                        continue;
                    };
                    let pixel = u16::from(hi) << 8 | u16::from(lo);
                    let r = ((pixel >> 10) & 0x1F) as u32 * 255 / 31;
                    let g = ((pixel >> 5) & 0x1F) as u32 * 255 / 31;
                    let b = (pixel & 0x1F) as u32 * 255 / 31;
                    // 0x7FFF (white) is the designated transparency key.
                    let a = if pixel == 0x7FFF { 0 } else { 255 };
                    px.copy_from_slice(&[r as u8, g as u8, b as u8, a]);
                }
            }
        }
        32 => {
            for y in 0..h {
                if y % 16 == 0 {
                    stop.check()?;
                }
                let row = y * scan;
                let out_row = &mut out[y * w * 4..(y + 1) * w * 4];
                for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
                    let (Some(&a), Some(&r), Some(&g), Some(&b)) = (
                        data.get(row + x),
                        data.get(row + w + x),
                        data.get(row + 2 * w + x),
                        data.get(row + 3 * w + x),
                    ) else {
                        continue;
                    };
                    px.copy_from_slice(&[r, g, b, a]);
                }
            }
        }
        other => return Err(ShockError::UnsupportedDepth(other)),
    }

    Ok(DecodedBitmap::new(info.width as u32, info.height as u32, out))
}
