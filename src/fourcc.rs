//! Four-character chunk type tags.

use core::fmt;

/// A four-character code identifying a chunk's semantic type.
///
/// Stored in file byte order for big-endian containers; the container
/// reader reverses tag bytes read from little-endian (`XFIR`) files so a
/// `FourCc` always compares equal to its ASCII spelling.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Key table directory.
    pub const KEY_TABLE: FourCc = FourCc(*b"KEY*");
    /// Cast slot array.
    pub const CAST_TABLE: FourCc = FourCc(*b"CAS*");
    /// Cast member record.
    pub const CAST_MEMBER: FourCc = FourCc(*b"CASt");
    /// Compressed bitmap pixel data.
    pub const BITMAP_DATA: FourCc = FourCc(*b"BITD");
    /// Color lookup table.
    pub const CLUT: FourCc = FourCc(*b"CLUT");
    /// PCM sound data (Mac `snd ` resource framing).
    pub const SOUND: FourCc = FourCc(*b"snd ");
    /// MP3-framed sound data.
    pub const SOUND_MP3: FourCc = FourCc(*b"ediM");
    /// Initial map, pointing at the memory map.
    pub const INITIAL_MAP: FourCc = FourCc(*b"imap");
    /// Memory map (the chunk directory proper).
    pub const MEMORY_MAP: FourCc = FourCc(*b"mmap");
    /// Freed directory slot.
    pub const FREE: FourCc = FourCc(*b"free");
    /// Junk directory slot.
    pub const JUNK: FourCc = FourCc(*b"junk");

    /// Reversed byte order, for tags read from little-endian containers.
    pub fn swapped(self) -> FourCc {
        let [a, b, c, d] = self.0;
        FourCc([d, c, b, a])
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(bytes: [u8; 4]) -> Self {
        FourCc(bytes)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({self})")
    }
}

/// Closed set of chunk roles the decode pipeline dispatches on.
///
/// Selected from the tag at lookup time; tags outside the set fall into
/// [`ChunkKind::Other`] and are carried as opaque bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkKind {
    KeyTable,
    CastTable,
    CastMember,
    BitmapData,
    Palette,
    Sound,
    Config,
    Other,
}

impl ChunkKind {
    pub fn from_fourcc(tag: FourCc) -> ChunkKind {
        match &tag.0 {
            b"KEY*" => ChunkKind::KeyTable,
            b"CAS*" => ChunkKind::CastTable,
            b"CASt" => ChunkKind::CastMember,
            b"BITD" => ChunkKind::BitmapData,
            b"CLUT" => ChunkKind::Palette,
            b"snd " | b"ediM" => ChunkKind::Sound,
            b"VWCF" | b"DRCF" => ChunkKind::Config,
            _ => ChunkKind::Other,
        }
    }
}
