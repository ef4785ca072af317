//! Chunk container reader.
//!
//! A movie file is a `RIFX` (big-endian) or `XFIR` (little-endian)
//! container: a 12-byte header, an `imap` chunk pointing at an `mmap`
//! chunk, and the `mmap` directory listing every chunk's tag, length and
//! absolute offset. A chunk's id is its index in that directory, which is
//! how every cross-reference in the file (key table, cast table) names it.
//!
//! The reader builds a random-access index and nothing more; chunk
//! payloads are handed out as borrowed byte ranges and interpreted by
//! type-specific consumers.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use log::debug;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;
use crate::fourcc::{ChunkKind, FourCc};

/// A tagged, independently addressable byte range within the container.
#[derive(Clone, Copy, Debug)]
pub struct ChunkSlice<'a> {
    pub id: u32,
    pub tag: FourCc,
    pub data: &'a [u8],
}

impl ChunkSlice<'_> {
    /// The closed chunk role this tag selects.
    pub fn kind(&self) -> ChunkKind {
        ChunkKind::from_fourcc(self.tag)
    }
}

#[derive(Clone, Copy, Debug)]
struct DirEntry {
    tag: FourCc,
    /// Absolute offset of the chunk payload (past the 8-byte chunk header).
    offset: usize,
    len: usize,
}

/// The parsed container: owned file bytes plus the directory index.
///
/// Immutable once built. All lookups are cheap slices into the owned
/// buffer, safe for concurrent read access.
pub struct ChunkContainer {
    data: Vec<u8>,
    endian: Endian,
    codec: FourCc,
    /// Indexed by chunk id; `None` marks freed/junk directory slots.
    entries: Vec<Option<DirEntry>>,
}

impl ChunkContainer {
    /// Parse the container header and chunk directory.
    ///
    /// Fails with a format error when the marker is absent or the
    /// directory is self-inconsistent; performs no decompression or
    /// interpretation of chunk contents.
    pub fn parse(data: Vec<u8>) -> Result<ChunkContainer, ShockError> {
        if data.len() < 4 {
            return Err(ShockError::UnrecognizedFormat);
        }
        let endian = match &data[0..4] {
            b"RIFX" => Endian::Big,
            b"XFIR" => Endian::Little,
            _ => return Err(ShockError::UnrecognizedFormat),
        };

        let mut header = Cursor::new(&data, endian);
        header.skip(4)?;
        let body_len = header.read_u32()?;
        let codec = header.read_fourcc()?;
        if matches!(&codec.0, b"FGDM" | b"FGDC") {
            return Err(ShockError::UnsupportedVariant(
                "afterburner-compressed movie".to_string(),
            ));
        }
        if (body_len as usize).saturating_add(8) > data.len() {
            // Declared body length may exceed the buffer on truncated
            // files; the directory walk below validates each offset, so
            // only note it here.
            debug!(
                "container declares {} body bytes but file has {}",
                body_len,
                data.len()
            );
        }

        let entries = read_directory(&data, endian)?;
        debug!(
            "container codec {codec}, {} directory slots ({} live)",
            entries.len(),
            entries.iter().filter(|e| e.is_some()).count()
        );

        Ok(ChunkContainer {
            data,
            endian,
            codec,
            entries,
        })
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn codec(&self) -> FourCc {
        self.codec
    }

    /// Random-access lookup by chunk id (directory index).
    pub fn chunk_by_id(&self, id: u32) -> Option<ChunkSlice<'_>> {
        let entry = (*self.entries.get(id as usize)?)?;
        Some(ChunkSlice {
            id,
            tag: entry.tag,
            data: &self.data[entry.offset..entry.offset + entry.len],
        })
    }

    /// Iterate all live chunks in directory order.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkSlice<'_>> {
        self.entries.iter().enumerate().filter_map(|(id, entry)| {
            entry.map(|e| ChunkSlice {
                id: id as u32,
                tag: e.tag,
                data: &self.data[e.offset..e.offset + e.len],
            })
        })
    }

    /// First chunk carrying the given tag, in directory order.
    pub fn first_with_tag(&self, tag: FourCc) -> Option<ChunkSlice<'_>> {
        self.chunks().find(|c| c.tag == tag)
    }
}

fn read_directory(data: &[u8], endian: Endian) -> Result<Vec<Option<DirEntry>>, ShockError> {
    // Running out of bytes mid-walk means the directory lies about the
    // file, the same failure as an offset past the end.
    walk_directory(data, endian).map_err(|err| match err {
        ShockError::UnexpectedEof => {
            ShockError::InvalidDirectory("directory truncated".to_string())
        }
        other => other,
    })
}

fn walk_directory(data: &[u8], endian: Endian) -> Result<Vec<Option<DirEntry>>, ShockError> {
    // imap sits immediately after the 12-byte container header and holds
    // the absolute offset of the memory map.
    let mut imap = Cursor::new(data, endian);
    imap.set_position(12)
        .map_err(|_| ShockError::InvalidDirectory("file too short for imap".to_string()))?;
    let imap_tag = imap.read_fourcc()?;
    if imap_tag != FourCc::INITIAL_MAP {
        return Err(ShockError::InvalidDirectory(format!(
            "expected imap after header, found {imap_tag}"
        )));
    }
    let _imap_len = imap.read_u32()?;
    let _mmap_count = imap.read_u32()?;
    let mmap_offset = imap.read_u32()? as usize;

    let mut mmap = Cursor::new(data, endian);
    mmap.set_position(mmap_offset)
        .map_err(|_| ShockError::InvalidDirectory("mmap offset beyond file".to_string()))?;
    let mmap_tag = mmap.read_fourcc()?;
    if mmap_tag != FourCc::MEMORY_MAP {
        return Err(ShockError::InvalidDirectory(format!(
            "imap points at {mmap_tag}, not mmap"
        )));
    }
    let _mmap_len = mmap.read_u32()?;

    let payload_start = mmap.pos();
    let header_len = mmap.read_u16()? as usize;
    let entry_len = mmap.read_u16()? as usize;
    let count_max = mmap.read_u32()?;
    let count_used = mmap.read_u32()?;
    // Junk/free list heads; slots on those lists are also tagged.
    let _junk_head = mmap.read_u32()?;
    let _junk_head2 = mmap.read_u32()?;
    let _free_head = mmap.read_u32()?;

    if count_used > count_max {
        return Err(ShockError::InvalidDirectory(format!(
            "directory claims {count_used} used of {count_max} slots"
        )));
    }
    if entry_len < 20 {
        return Err(ShockError::InvalidDirectory(format!(
            "directory entry length {entry_len} too small"
        )));
    }

    // The claimed count must fit in the file before anything is
    // allocated for it; only the first 12 bytes of the last entry's
    // stride have to be present.
    let entries_start = payload_start + header_len;
    if let Some(n) = (count_used as usize).checked_sub(1) {
        let end = n
            .checked_mul(entry_len)
            .and_then(|v| v.checked_add(entries_start))
            .and_then(|v| v.checked_add(12));
        if end.map_or(true, |e| e > data.len()) {
            return Err(ShockError::InvalidDirectory(format!(
                "directory claims {count_used} entries of {entry_len} bytes \
                 in a {} byte file",
                data.len()
            )));
        }
    }

    let mut entries = Vec::with_capacity(count_used as usize);
    for id in 0..count_used {
        let entry_pos = entries_start + id as usize * entry_len;
        let mut e = Cursor::new(data, endian);
        e.set_position(entry_pos).map_err(|_| {
            ShockError::InvalidDirectory(format!("directory entry {id} beyond file"))
        })?;
        let tag = e.read_fourcc()?;
        let len = e.read_u32()? as usize;
        let offset = e.read_u32()? as usize;

        if matches!(tag, FourCc::FREE | FourCc::JUNK) || tag == FourCc([0; 4]) {
            entries.push(None);
            continue;
        }

        // Offset names the chunk header; the payload follows it. Both
        // must land inside the file, and the on-chunk tag must agree
        // with the directory.
        let payload = offset.checked_add(8).ok_or_else(|| {
            ShockError::InvalidDirectory(format!("chunk {id} offset overflow"))
        })?;
        let end = payload.checked_add(len).ok_or_else(|| {
            ShockError::InvalidDirectory(format!("chunk {id} length overflow"))
        })?;
        if end > data.len() {
            return Err(ShockError::InvalidDirectory(format!(
                "chunk {id} ({tag}) spans {offset}..{end} but file ends at {}",
                data.len()
            )));
        }
        let mut on_chunk = Cursor::new(data, endian);
        on_chunk.set_position(offset)?;
        let on_chunk_tag = on_chunk.read_fourcc()?;
        if on_chunk_tag != tag {
            return Err(ShockError::InvalidDirectory(format!(
                "directory says chunk {id} is {tag} but file says {on_chunk_tag}"
            )));
        }

        entries.push(Some(DirEntry {
            tag,
            offset: payload,
            len,
        }));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn rejects_missing_marker() {
        assert!(matches!(
            ChunkContainer::parse(b"RIFF1234WAVE".to_vec()),
            Err(ShockError::UnrecognizedFormat)
        ));
        assert!(matches!(
            ChunkContainer::parse(vec![]),
            Err(ShockError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn rejects_afterburner_codec() {
        let mut data = b"RIFX".to_vec();
        data.extend_from_slice(&8u32.to_be_bytes());
        data.extend_from_slice(b"FGDM");
        assert!(matches!(
            ChunkContainer::parse(data),
            Err(ShockError::UnsupportedVariant(_))
        ));
    }

    fn header_with_directory_counts(count_max: u32, count_used: u32) -> Vec<u8> {
        let mut data = b"RIFX".to_vec();
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"MV93");
        data.extend_from_slice(b"imap");
        data.extend_from_slice(&12u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&32u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"mmap");
        data.extend_from_slice(&24u32.to_be_bytes());
        data.extend_from_slice(&24u16.to_be_bytes());
        data.extend_from_slice(&20u16.to_be_bytes());
        data.extend_from_slice(&count_max.to_be_bytes());
        data.extend_from_slice(&count_used.to_be_bytes());
        data.extend_from_slice(&[0u8; 12]);
        data
    }

    #[test]
    fn empty_directory_parses() {
        let container = ChunkContainer::parse(header_with_directory_counts(0, 0)).unwrap();
        assert_eq!(container.chunks().count(), 0);
    }

    #[test]
    fn absurd_directory_count_is_rejected_before_allocation() {
        // A 64-byte file claiming 134M directory entries.
        let data = header_with_directory_counts(0x0800_0000, 0x0800_0000);
        assert!(matches!(
            ChunkContainer::parse(data),
            Err(ShockError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn truncated_directory_is_inconsistent() {
        let mut data = header_with_directory_counts(1, 1);
        // Cut the file mid-header, before the junk/free list fields.
        data.truncate(48);
        assert!(matches!(
            ChunkContainer::parse(data),
            Err(ShockError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn rejects_header_without_directory() {
        let mut data = b"RIFX".to_vec();
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(b"MV93");
        assert!(matches!(
            ChunkContainer::parse(data),
            Err(ShockError::InvalidDirectory(_))
        ));
    }
}
