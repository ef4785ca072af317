//! Movie config record (`VWCF`/`DRCF` chunk).
//!
//! Supplies the stage rectangle, tempo and the cast slot numbering base
//! (`min_member`). Config fields are big-endian regardless of the
//! container's byte order.

use alloc::format;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;

#[derive(Clone, Copy, Debug, Default)]
pub struct MovieConfig {
    pub file_version: u16,
    pub stage_top: i16,
    pub stage_left: i16,
    pub stage_bottom: i16,
    pub stage_right: i16,
    /// First member number in the `CAS*` slot array.
    pub min_member: u16,
    pub max_member: u16,
    /// Frames per second.
    pub tempo: u8,
    /// Authoring-tool version that wrote the file, when the record is
    /// long enough to carry it.
    pub director_version: Option<u16>,
}

impl MovieConfig {
    pub fn parse(data: &[u8]) -> Result<MovieConfig, ShockError> {
        let mut c = Cursor::new(data, Endian::Big);
        let record_len = c.read_u16()? as usize;
        if record_len < 18 || data.len() < 18 {
            return Err(ShockError::InvalidHeader(format!(
                "movie config record of {} bytes (declared {record_len}) too short",
                data.len()
            )));
        }
        let file_version = c.read_u16()?;
        let stage_top = c.read_i16()?;
        let stage_left = c.read_i16()?;
        let stage_bottom = c.read_i16()?;
        let stage_right = c.read_i16()?;
        let min_member = c.read_u16()?;
        let max_member = c.read_u16()?;
        let tempo = c.read_u8()?;

        let director_version = if data.len() >= 38 {
            c.set_position(36)?;
            Some(c.read_u16()?)
        } else {
            None
        };

        Ok(MovieConfig {
            file_version,
            stage_top,
            stage_left,
            stage_bottom,
            stage_right,
            min_member,
            max_member,
            tempo,
            director_version,
        })
    }

    pub fn stage_width(&self) -> u16 {
        (self.stage_right as i32 - self.stage_left as i32).max(0) as u16
    }

    pub fn stage_height(&self) -> u16 {
        (self.stage_bottom as i32 - self.stage_top as i32).max(0) as u16
    }
}
