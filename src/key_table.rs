//! Key table: the directory mapping an owning chunk to the chunks that
//! belong to it.
//!
//! A cast member may own several associated chunks (bitmap data, sound
//! data, edit state), each recorded as one entry. Entries are kept in
//! file order because consumers rely on first-matching-entry-wins when an
//! owner has more than one entry with the same tag.

use alloc::format;
use alloc::vec::Vec;

use crate::cursor::{Cursor, Endian};
use crate::error::ShockError;
use crate::fourcc::FourCc;

/// One owner → chunk association.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyTableEntry {
    /// Chunk id of the associated chunk.
    pub section_id: u32,
    /// Chunk id of the owning chunk (a `CASt` chunk for member assets).
    pub owner_id: u32,
    pub tag: FourCc,
}

/// Parsed `KEY*` chunk. Read-only after the container parse.
pub struct KeyTable {
    entries: Vec<KeyTableEntry>,
}

impl KeyTable {
    /// Parse the key table from its chunk payload.
    pub fn parse(data: &[u8], endian: Endian) -> Result<KeyTable, ShockError> {
        let mut c = Cursor::new(data, endian);
        let entry_size = c.read_u16()? as usize;
        let _entry_size2 = c.read_u16()?;
        let count_max = c.read_u32()?;
        let count_used = c.read_u32()?;

        if entry_size < 12 {
            return Err(ShockError::InvalidHeader(format!(
                "key table entry size {entry_size} too small"
            )));
        }
        if count_used > count_max {
            return Err(ShockError::InvalidHeader(format!(
                "key table claims {count_used} used of {count_max} entries"
            )));
        }

        let header_end = c.pos();
        // The claimed count must fit in the chunk before anything is
        // allocated for it. The last entry only needs its 12 read bytes,
        // not the full stride.
        if let Some(n) = (count_used as usize).checked_sub(1) {
            let end = n
                .checked_mul(entry_size)
                .and_then(|v| v.checked_add(header_end))
                .and_then(|v| v.checked_add(12));
            if end.map_or(true, |e| e > data.len()) {
                return Err(ShockError::InvalidHeader(format!(
                    "key table claims {count_used} entries of {entry_size} bytes \
                     in a {} byte chunk",
                    data.len()
                )));
            }
        }
        let mut entries = Vec::with_capacity(count_used as usize);
        for i in 0..count_used as usize {
            c.set_position(header_end + i * entry_size)?;
            let section_id = c.read_u32()?;
            let owner_id = c.read_u32()?;
            let tag = c.read_fourcc()?;
            entries.push(KeyTableEntry {
                section_id,
                owner_id,
                tag,
            });
        }

        Ok(KeyTable { entries })
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[KeyTableEntry] {
        &self.entries
    }

    /// Entries belonging to one owner, preserving file order. An owner
    /// with no entries yields an empty iterator, not an error.
    pub fn entries_for_owner(&self, owner_id: u32) -> impl Iterator<Item = &KeyTableEntry> {
        self.entries.iter().filter(move |e| e.owner_id == owner_id)
    }

    /// First entry for `owner_id` carrying `tag`, if any.
    pub fn find(&self, owner_id: u32, tag: FourCc) -> Option<&KeyTableEntry> {
        self.entries_for_owner(owner_id).find(|e| e.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn build_key_table(entries: &[(u32, u32, &[u8; 4])]) -> Vec<u8> {
        let mut data = vec![];
        data.extend_from_slice(&12u16.to_be_bytes());
        data.extend_from_slice(&12u16.to_be_bytes());
        data.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        data.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (section, owner, tag) in entries {
            data.extend_from_slice(&section.to_be_bytes());
            data.extend_from_slice(&owner.to_be_bytes());
            data.extend_from_slice(*tag);
        }
        data
    }

    #[test]
    fn preserves_file_order_per_owner() {
        let data = build_key_table(&[
            (7, 3, b"BITD"),
            (9, 4, b"snd "),
            (8, 3, b"BITD"),
            (10, 3, b"ediM"),
        ]);
        let kt = KeyTable::parse(&data, Endian::Big).unwrap();

        let for_3: Vec<_> = kt.entries_for_owner(3).map(|e| e.section_id).collect();
        assert_eq!(for_3, [7, 8, 10]);
        // First matching entry wins.
        assert_eq!(kt.find(3, FourCc::BITMAP_DATA).unwrap().section_id, 7);
    }

    #[test]
    fn unknown_owner_is_empty_not_an_error() {
        let data = build_key_table(&[(7, 3, b"BITD")]);
        let kt = KeyTable::parse(&data, Endian::Big).unwrap();
        assert_eq!(kt.entries_for_owner(99).count(), 0);
    }

    #[test]
    fn truncated_table_is_a_format_error() {
        let mut data = build_key_table(&[(7, 3, b"BITD")]);
        data.truncate(data.len() - 4);
        assert!(matches!(
            KeyTable::parse(&data, Endian::Big),
            Err(ShockError::InvalidHeader(_))
        ));
    }

    #[test]
    fn absurd_entry_count_is_rejected_before_allocation() {
        // Header claims a billion entries in a 12-byte payload.
        let mut data = vec![];
        data.extend_from_slice(&12u16.to_be_bytes());
        data.extend_from_slice(&12u16.to_be_bytes());
        data.extend_from_slice(&0x4000_0000u32.to_be_bytes());
        data.extend_from_slice(&0x4000_0000u32.to_be_bytes());
        assert!(matches!(
            KeyTable::parse(&data, Endian::Big),
            Err(ShockError::InvalidHeader(_))
        ));
    }

    #[test]
    fn oversized_entry_stride_is_honored() {
        // 16-byte entries: 4 trailing pad bytes each.
        let mut data = vec![];
        data.extend_from_slice(&16u16.to_be_bytes());
        data.extend_from_slice(&16u16.to_be_bytes());
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&2u32.to_be_bytes());
        for (section, owner) in [(5u32, 2u32), (6, 2)] {
            data.extend_from_slice(&section.to_be_bytes());
            data.extend_from_slice(&owner.to_be_bytes());
            data.extend_from_slice(b"BITD");
            data.extend_from_slice(&[0; 4]);
        }
        let kt = KeyTable::parse(&data, Endian::Big).unwrap();
        let ids: Vec<_> = kt.entries_for_owner(2).map(|e| e.section_id).collect();
        assert_eq!(ids, [5, 6]);
    }
}
