//! Color lookup tables.
//!
//! Indexed bitmaps (depths 1/4/8) resolve pixel values through a palette:
//! either a `CLUT` chunk owned by a palette-type cast member, or the
//! built-in Macintosh 256-color system palette when the referenced
//! palette is absent from the file.

use alloc::vec::Vec;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;

/// An ordered sequence of RGB triples.
#[derive(Clone, Debug)]
pub struct Palette {
    pub id: u32,
    pub colors: Vec<(u8, u8, u8)>,
}

impl Palette {
    /// Parse a `CLUT` chunk payload: six bytes per entry, three
    /// big-endian 16-bit components of which the high byte is kept.
    /// Trailing partial entries are ignored.
    pub fn parse(id: u32, data: &[u8]) -> Result<Palette, ShockError> {
        let mut c = Cursor::new(data, Endian::Big);
        let count = data.len() / 6;
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let r = (c.read_u16()? >> 8) as u8;
            let g = (c.read_u16()? >> 8) as u8;
            let b = (c.read_u16()? >> 8) as u8;
            colors.push((r, g, b));
        }
        Ok(Palette { id, colors })
    }

    /// The classic Macintosh 8-bit system palette: a 6x6x6 color cube
    /// (pure black displaced to the final slot), then 10-step red, green,
    /// blue and gray ramps filling the values the cube lacks.
    pub fn mac_system() -> Palette {
        let mut colors = Vec::with_capacity(256);
        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    if (r, g, b) == (5, 5, 5) {
                        continue;
                    }
                    colors.push((
                        (255 - 51 * r) as u8,
                        (255 - 51 * g) as u8,
                        (255 - 51 * b) as u8,
                    ));
                }
            }
        }
        // Multiples of 17 that are not multiples of 51, descending.
        const RAMP: [u8; 10] = [238, 221, 187, 170, 136, 119, 85, 68, 34, 17];
        for v in RAMP {
            colors.push((v, 0, 0));
        }
        for v in RAMP {
            colors.push((0, v, 0));
        }
        for v in RAMP {
            colors.push((0, 0, v));
        }
        for v in RAMP {
            colors.push((v, v, v));
        }
        colors.push((0, 0, 0));
        Palette { id: 0, colors }
    }
}
