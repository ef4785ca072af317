//! Cast member records.
//!
//! The `CAS*` chunk is the cast directory: one chunk id per member slot,
//! zero for empty slots. Each live slot names a `CASt` chunk holding the
//! member's type tag, an info block (display name and other authoring
//! metadata) and a type-specific data blob that bitmap members carry
//! their geometry in.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::warn;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;

/// Member type tag from the `CASt` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberType {
    Bitmap,
    FilmLoop,
    Field,
    Palette,
    Picture,
    Sound,
    Button,
    Shape,
    Movie,
    DigitalVideo,
    Script,
    Text,
    Other(u32),
}

impl MemberType {
    pub fn from_raw(raw: u32) -> MemberType {
        match raw {
            1 => MemberType::Bitmap,
            2 => MemberType::FilmLoop,
            3 => MemberType::Field,
            4 => MemberType::Palette,
            5 => MemberType::Picture,
            6 => MemberType::Sound,
            7 => MemberType::Button,
            8 => MemberType::Shape,
            9 => MemberType::Movie,
            10 => MemberType::DigitalVideo,
            11 => MemberType::Script,
            12 => MemberType::Text,
            other => MemberType::Other(other),
        }
    }

    pub fn is_bitmap(&self) -> bool {
        *self == MemberType::Bitmap
    }

    pub fn is_sound(&self) -> bool {
        *self == MemberType::Sound
    }
}

/// One named, typed asset slot in the cast library.
#[derive(Clone, Debug)]
pub struct CastMember {
    /// Member number (slot index plus the cast's minimum member number).
    pub number: u32,
    /// Chunk id of this member's `CASt` chunk; the key table keys owned
    /// chunks (bitmap data, sound data) by this id.
    pub section_id: u32,
    pub member_type: MemberType,
    pub name: Option<String>,
    /// Opaque type-specific blob; bitmap members encode their geometry
    /// here (see [`crate::bitmap::BitmapInfo`]).
    pub specific: Vec<u8>,
}

impl CastMember {
    /// Parse a `CASt` chunk payload.
    pub fn parse(
        section_id: u32,
        number: u32,
        data: &[u8],
        endian: Endian,
    ) -> Result<CastMember, ShockError> {
        let mut c = Cursor::new(data, endian);
        let raw_type = c.read_u32()?;
        let info_len = c.read_u32()? as usize;
        let specific_len = c.read_u32()? as usize;

        let info = c.read_bytes(info_len).map_err(|_| {
            ShockError::InvalidHeader(format!(
                "member {number}: info block of {info_len} bytes exceeds chunk"
            ))
        })?;
        // Some producers round the specific blob up past the chunk end;
        // take what is actually there.
        let specific = c.read_bytes(specific_len.min(c.remaining()))?;

        // A mangled info block costs the display name, not the member.
        let name = if info.is_empty() {
            None
        } else {
            match parse_member_name(info, endian) {
                Ok(name) => name,
                Err(err) => {
                    warn!("member {number}: unreadable name: {err}");
                    None
                }
            }
        };

        Ok(CastMember {
            number,
            section_id,
            member_type: MemberType::from_raw(raw_type),
            name,
            specific: specific.to_vec(),
        })
    }
}

/// Parse the `CAS*` slot array: one chunk id per member slot, zero for
/// empty slots (callers skip those, they are not errors).
pub(crate) fn parse_cast_table(data: &[u8], endian: Endian) -> Result<Vec<u32>, ShockError> {
    let mut c = Cursor::new(data, endian);
    let mut slots = Vec::with_capacity(data.len() / 4);
    for _ in 0..data.len() / 4 {
        slots.push(c.read_u32()?);
    }
    Ok(slots)
}

/// Pull the display name out of a member info block.
///
/// The block starts with a fixed header whose first field is the offset
/// of an item list: a u16 item count, that many u32 item offsets, the
/// total item bytes length, then the packed items. The name is item 1, a
/// Pascal string. Members authored without a name simply have fewer
/// items.
fn parse_member_name(info: &[u8], endian: Endian) -> Result<Option<String>, ShockError> {
    let mut c = Cursor::new(info, endian);
    let data_offset = c.read_u32()? as usize;
    c.set_position(data_offset).map_err(|_| {
        ShockError::InvalidHeader(format!(
            "member info list offset {data_offset} exceeds {} byte block",
            info.len()
        ))
    })?;

    let item_count = c.read_u16()? as usize;
    if item_count < 2 {
        return Ok(None);
    }
    let mut offsets = Vec::with_capacity(item_count);
    for _ in 0..item_count {
        offsets.push(c.read_u32()? as usize);
    }
    let items_len = c.read_u32()? as usize;
    let items_start = c.pos();

    let start = offsets[1];
    let end = if item_count > 2 { offsets[2] } else { items_len };
    if start > end || end > items_len {
        return Err(ShockError::InvalidHeader(format!(
            "member name item spans {start}..{end} of {items_len} item bytes"
        )));
    }
    let mut item = Cursor::new(info, endian);
    item.set_position(items_start + start)?;
    let item = item.read_bytes(end - start)?;
    if item.is_empty() {
        return Ok(None);
    }

    // Pascal string: length byte, then MacRoman text. Map bytes through
    // Latin-1 rather than dropping non-ASCII names.
    let len = item[0] as usize;
    let text = &item[1..item.len().min(1 + len)];
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(text.iter().map(|&b| b as char).collect()))
}
