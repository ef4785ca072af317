//! Synthetic movie construction.
//!
//! Builds byte-exact `RIFX`/`XFIR` containers in memory: header, `imap`,
//! `mmap` directory, then caller-supplied chunks. Directory ids 0..=2
//! are the container, `imap` and `mmap` chunks themselves, matching how
//! authoring tools lay files out; `add` returns ids from 3 up.

pub struct MovieBuilder {
    big: bool,
    chunks: Vec<Option<([u8; 4], Vec<u8>)>>,
}

const MMAP_OFFSET: usize = 32;
const MMAP_HEADER_LEN: usize = 24;
const ENTRY_LEN: usize = 20;

impl MovieBuilder {
    pub fn big_endian() -> MovieBuilder {
        MovieBuilder {
            big: true,
            chunks: Vec::new(),
        }
    }

    pub fn little_endian() -> MovieBuilder {
        MovieBuilder {
            big: false,
            chunks: Vec::new(),
        }
    }

    /// Append a chunk, returning its directory id.
    pub fn add(&mut self, tag: &[u8; 4], payload: Vec<u8>) -> u32 {
        self.chunks.push(Some((*tag, payload)));
        (2 + self.chunks.len()) as u32
    }

    /// Append a freed directory slot, returning its id.
    pub fn add_free(&mut self) -> u32 {
        self.chunks.push(None);
        (2 + self.chunks.len()) as u32
    }

    pub fn build(&self) -> Vec<u8> {
        let n = 3 + self.chunks.len();
        let mmap_len = MMAP_HEADER_LEN + n * ENTRY_LEN;

        let mut offsets = Vec::new();
        let mut pos = MMAP_OFFSET + 8 + mmap_len;
        for chunk in &self.chunks {
            pos += pos % 2;
            offsets.push(pos);
            pos += 8 + chunk.as_ref().map_or(0, |(_, p)| p.len());
        }
        let total = pos;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(if self.big { b"RIFX" } else { b"XFIR" });
        self.push_u32(&mut out, (total - 8) as u32);
        self.push_tag(&mut out, b"MV93");

        // imap payload: map count, mmap offset, version. The trailing
        // version field carries the chunk to where mmap starts.
        self.push_tag(&mut out, b"imap");
        self.push_u32(&mut out, 12);
        self.push_u32(&mut out, 1);
        self.push_u32(&mut out, MMAP_OFFSET as u32);
        self.push_u32(&mut out, 0);

        self.push_tag(&mut out, b"mmap");
        self.push_u32(&mut out, mmap_len as u32);
        self.push_u16(&mut out, MMAP_HEADER_LEN as u16);
        self.push_u16(&mut out, ENTRY_LEN as u16);
        self.push_u32(&mut out, n as u32);
        self.push_u32(&mut out, n as u32);
        for _ in 0..3 {
            self.push_u32(&mut out, 0);
        }

        self.push_entry(&mut out, b"RIFX", (total - 8) as u32, 0);
        self.push_entry(&mut out, b"imap", 12, 12);
        self.push_entry(&mut out, b"mmap", mmap_len as u32, MMAP_OFFSET as u32);
        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                Some((tag, payload)) => {
                    self.push_entry(&mut out, tag, payload.len() as u32, offsets[i] as u32)
                }
                None => self.push_entry(&mut out, b"free", 0, 0),
            }
        }

        for (i, chunk) in self.chunks.iter().enumerate() {
            if let Some((tag, payload)) = chunk {
                while out.len() < offsets[i] {
                    out.push(0);
                }
                self.push_tag(&mut out, tag);
                self.push_u32(&mut out, payload.len() as u32);
                out.extend_from_slice(payload);
            }
        }
        out
    }

    /// `KEY*` payload from (section_id, owner_id, tag) triples.
    pub fn key_table_chunk(&self, entries: &[(u32, u32, [u8; 4])]) -> Vec<u8> {
        let mut data = Vec::new();
        self.push_u16(&mut data, 12);
        self.push_u16(&mut data, 12);
        self.push_u32(&mut data, entries.len() as u32);
        self.push_u32(&mut data, entries.len() as u32);
        for &(section, owner, tag) in entries {
            self.push_u32(&mut data, section);
            self.push_u32(&mut data, owner);
            self.push_tag(&mut data, &tag);
        }
        data
    }

    /// `CAS*` payload: one chunk id per slot, zero meaning empty.
    pub fn cast_table_chunk(&self, slots: &[u32]) -> Vec<u8> {
        let mut data = Vec::new();
        for &slot in slots {
            self.push_u32(&mut data, slot);
        }
        data
    }

    /// `CASt` payload with an optional display name.
    pub fn cast_member_chunk(&self, raw_type: u32, name: Option<&str>, specific: &[u8]) -> Vec<u8> {
        let info = match name {
            Some(name) => self.member_info(name),
            None => Vec::new(),
        };
        let mut data = Vec::new();
        self.push_u32(&mut data, raw_type);
        self.push_u32(&mut data, info.len() as u32);
        self.push_u32(&mut data, specific.len() as u32);
        data.extend_from_slice(&info);
        data.extend_from_slice(specific);
        data
    }

    // Member info block: header pointing at a two-item list, item 1
    // being the Pascal-string name.
    fn member_info(&self, name: &str) -> Vec<u8> {
        let mut info = Vec::new();
        self.push_u32(&mut info, 20);
        info.extend_from_slice(&[0u8; 16]);
        self.push_u16(&mut info, 2);
        self.push_u32(&mut info, 0);
        self.push_u32(&mut info, 0);
        self.push_u32(&mut info, (1 + name.len()) as u32);
        info.push(name.len() as u8);
        info.extend_from_slice(name.as_bytes());
        info
    }

    fn push_u16(&self, out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&if self.big {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        });
    }

    fn push_u32(&self, out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&if self.big {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        });
    }

    fn push_tag(&self, out: &mut Vec<u8>, tag: &[u8; 4]) {
        if self.big {
            out.extend_from_slice(tag);
        } else {
            out.extend_from_slice(&[tag[3], tag[2], tag[1], tag[0]]);
        }
    }

    fn push_entry(&self, out: &mut Vec<u8>, tag: &[u8; 4], len: u32, offset: u32) {
        self.push_tag(out, tag);
        self.push_u32(out, len);
        self.push_u32(out, offset);
        out.extend_from_slice(&[0u8; ENTRY_LEN - 12]);
    }
}

/// Bitmap member specific blob: full 15-byte record, big-endian.
pub fn bitmap_specific(width: u16, height: u16, depth: u16, palette_id: u8) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0i16.to_be_bytes());
    data.extend_from_slice(&0i16.to_be_bytes());
    data.extend_from_slice(&(height as i16).to_be_bytes());
    data.extend_from_slice(&(width as i16).to_be_bytes());
    data.extend_from_slice(&depth.to_be_bytes());
    data.push(palette_id);
    data.extend_from_slice(&0i16.to_be_bytes());
    data.extend_from_slice(&0i16.to_be_bytes());
    data
}

/// `VWCF` payload; big-endian regardless of the container order.
pub fn config_chunk(stage: [i16; 4], min_member: u16, tempo: u8) -> Vec<u8> {
    let mut data = vec![0u8; 40];
    data[0..2].copy_from_slice(&40u16.to_be_bytes());
    data[2..4].copy_from_slice(&0x045Du16.to_be_bytes());
    for (i, v) in stage.iter().enumerate() {
        data[4 + i * 2..6 + i * 2].copy_from_slice(&v.to_be_bytes());
    }
    data[12..14].copy_from_slice(&min_member.to_be_bytes());
    data[14..16].copy_from_slice(&200u16.to_be_bytes());
    data[16] = tempo;
    data[36..38].copy_from_slice(&0x0570u16.to_be_bytes());
    data
}

/// `CLUT` payload: three 16-bit components per entry.
pub fn clut_chunk(colors: &[(u8, u8, u8)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(r, g, b) in colors {
        for v in [r, g, b] {
            data.extend_from_slice(&(u16::from(v) << 8).to_be_bytes());
        }
    }
    data
}
