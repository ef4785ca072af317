//! The parsed movie: container index, key table, config, cast registry
//! and palette table, built once by [`DirectorFile::load`] and immutable
//! afterwards.
//!
//! Every query borrows from the loaded value; there is no process-wide
//! current-file state. All lookups are read-only, so decoding many
//! members concurrently needs no locking.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use enough::Stop;
use log::{debug, warn};

use crate::bitmap::{decode_bitmap_data, BitmapInfo, DecodedBitmap};
use crate::cast::{parse_cast_table, CastMember, MemberType};
use crate::config::MovieConfig;
use crate::cursor::Endian;
use crate::error::ShockError;
use crate::fourcc::{ChunkKind, FourCc};
use crate::key_table::KeyTable;
use crate::limits::Limits;
use crate::palette::Palette;
use crate::rifx::{ChunkContainer, ChunkSlice};
use crate::sound::SoundData;

const CONFIG_TAGS: [FourCc; 2] = [FourCc(*b"VWCF"), FourCc(*b"DRCF")];

pub struct DirectorFile {
    container: ChunkContainer,
    key_table: KeyTable,
    config: Option<MovieConfig>,
    members: Vec<CastMember>,
    /// Palettes keyed by owning member number.
    palettes: BTreeMap<u32, Palette>,
    system_palette: Palette,
}

impl DirectorFile {
    /// Parse a whole movie held in memory.
    ///
    /// Container-level format errors abort the load; nothing useful can
    /// be derived without the directory and key table. Per-member
    /// problems are deferred to the member decode calls.
    pub fn load(data: Vec<u8>) -> Result<DirectorFile, ShockError> {
        let container = ChunkContainer::parse(data)?;
        let endian = container.endian();

        let key_chunk = container.first_with_tag(FourCc::KEY_TABLE).ok_or_else(|| {
            ShockError::InvalidDirectory("container has no key table chunk".to_string())
        })?;
        let key_table = KeyTable::parse(key_chunk.data, endian)?;

        // Movie config is wanted but not required for decoding; a
        // malformed one costs only the stage metadata and slot base.
        let config = CONFIG_TAGS
            .iter()
            .find_map(|&tag| container.first_with_tag(tag))
            .and_then(|chunk| match MovieConfig::parse(chunk.data) {
                Ok(cfg) => Some(cfg),
                Err(err) => {
                    warn!("ignoring malformed movie config: {err}");
                    None
                }
            });

        let members = read_cast(&container, endian, &config);
        let palettes = read_palettes(&container, &key_table, &members);
        debug!(
            "loaded {} cast members, {} palettes",
            members.len(),
            palettes.len()
        );

        Ok(DirectorFile {
            container,
            key_table,
            config,
            members,
            palettes,
            system_palette: Palette::mac_system(),
        })
    }

    pub fn container(&self) -> &ChunkContainer {
        &self.container
    }

    pub fn key_table(&self) -> &KeyTable {
        &self.key_table
    }

    pub fn config(&self) -> Option<&MovieConfig> {
        self.config.as_ref()
    }

    /// Cast members in slot order. Empty slots are not represented.
    pub fn members(&self) -> &[CastMember] {
        &self.members
    }

    pub fn member_by_number(&self, number: u32) -> Option<&CastMember> {
        self.members.iter().find(|m| m.number == number)
    }

    pub fn chunk_by_id(&self, id: u32) -> Option<ChunkSlice<'_>> {
        self.container.chunk_by_id(id)
    }

    /// Palettes found in the file, keyed by owning member number.
    pub fn palettes(&self) -> &BTreeMap<u32, Palette> {
        &self.palettes
    }

    /// Resolve a bitmap's palette reference; an id the file does not
    /// define falls back to the built-in system palette.
    pub fn palette_for(&self, palette_id: u8) -> &Palette {
        self.palettes
            .get(&u32::from(palette_id))
            .unwrap_or(&self.system_palette)
    }

    /// Decode one bitmap member to its metadata and RGBA pixels.
    ///
    /// Recoverable per-member failures (no `BITD` chunk, unknown depth)
    /// come back as error values; they do not disturb other members.
    pub fn decode_bitmap(
        &self,
        member: &CastMember,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<(BitmapInfo, DecodedBitmap), ShockError> {
        let info = BitmapInfo::parse(&member.specific)?;

        // First matching key-table entry wins when a member owns
        // several bitmap chunks (edit history leaves extras behind).
        let entry = self
            .key_table
            .find(member.section_id, FourCc::BITMAP_DATA)
            .ok_or(ShockError::MissingChunk {
                owner: member.number,
                fourcc: FourCc::BITMAP_DATA,
            })?;
        let chunk = self
            .chunk_by_id(entry.section_id)
            .ok_or(ShockError::MissingChunk {
                owner: member.number,
                fourcc: FourCc::BITMAP_DATA,
            })?;

        let palette = self.palette_for(info.palette_id);
        let pixels = decode_bitmap_data(chunk.data, &info, palette, limits, stop)?;
        Ok((info, pixels))
    }

    /// Locate a sound member's data chunk and report its framing.
    pub fn sound(&self, member: &CastMember) -> Result<SoundData, ShockError> {
        for tag in [FourCc::SOUND_MP3, FourCc::SOUND] {
            if let Some(entry) = self.key_table.find(member.section_id, tag) {
                if let Some(chunk) = self.chunk_by_id(entry.section_id) {
                    return Ok(SoundData::from_chunk(chunk.tag, chunk.data));
                }
            }
        }
        Err(ShockError::MissingChunk {
            owner: member.number,
            fourcc: FourCc::SOUND,
        })
    }

    /// Walk every cast member, decoding what the pipeline understands.
    ///
    /// Bitmap members yield pixels, sound members yield their framed
    /// payload, everything else passes through as metadata only.
    /// Per-member failures are recorded in the report and the walk
    /// continues; only cancellation aborts it.
    pub fn decode_members(
        &self,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<ExtractOutcome<'_>, ShockError> {
        let mut assets = Vec::new();
        let mut report = DecodeReport::default();

        for member in &self.members {
            stop.check()?;
            let asset = match member.member_type {
                MemberType::Bitmap => self
                    .decode_bitmap(member, limits, stop)
                    .map(|(info, pixels)| MemberAsset::Bitmap { info, pixels }),
                MemberType::Sound => self.sound(member).map(MemberAsset::Sound),
                _ => {
                    report.passed_through += 1;
                    assets.push(DecodedMember {
                        member,
                        asset: MemberAsset::Metadata,
                    });
                    continue;
                }
            };

            match asset {
                Ok(asset) => {
                    match asset {
                        MemberAsset::Bitmap { .. } => report.bitmaps += 1,
                        MemberAsset::Sound(_) => report.sounds += 1,
                        MemberAsset::Metadata => {}
                    }
                    assets.push(DecodedMember { member, asset });
                }
                Err(err @ ShockError::Cancelled(_)) => return Err(err),
                Err(err) => {
                    warn!(
                        "member {} ({}): {err}",
                        member.number,
                        member.name.as_deref().unwrap_or("unnamed")
                    );
                    report.failures.push(MemberFailure {
                        number: member.number,
                        name: member.name.clone(),
                        error: err,
                    });
                }
            }
        }

        Ok(ExtractOutcome { assets, report })
    }
}

fn read_cast(
    container: &ChunkContainer,
    endian: Endian,
    config: &Option<MovieConfig>,
) -> Vec<CastMember> {
    let Some(table) = container.first_with_tag(FourCc::CAST_TABLE) else {
        debug!("container has no cast table chunk");
        return Vec::new();
    };
    let slots = match parse_cast_table(table.data, endian) {
        Ok(slots) => slots,
        Err(err) => {
            warn!("ignoring malformed cast table: {err}");
            return Vec::new();
        }
    };

    let min_member = config.as_ref().map(|c| u32::from(c.min_member)).unwrap_or(1);
    let mut members = Vec::new();
    for (slot, &section_id) in slots.iter().enumerate() {
        if section_id == 0 {
            // Empty slot, not an error.
            continue;
        }
        let number = min_member + slot as u32;
        let Some(chunk) = container.chunk_by_id(section_id) else {
            warn!("cast slot {number} names missing chunk {section_id}");
            continue;
        };
        if chunk.kind() != ChunkKind::CastMember {
            warn!("cast slot {number} names a {} chunk", chunk.tag);
            continue;
        }
        match CastMember::parse(section_id, number, chunk.data, endian) {
            Ok(member) => members.push(member),
            Err(err) => warn!("cast slot {number}: {err}"),
        }
    }
    members
}

fn read_palettes(
    container: &ChunkContainer,
    key_table: &KeyTable,
    members: &[CastMember],
) -> BTreeMap<u32, Palette> {
    let mut palettes = BTreeMap::new();
    for member in members {
        if member.member_type != MemberType::Palette {
            continue;
        }
        let Some(entry) = key_table.find(member.section_id, FourCc::CLUT) else {
            continue;
        };
        let Some(chunk) = container.chunk_by_id(entry.section_id) else {
            continue;
        };
        match Palette::parse(member.number, chunk.data) {
            Ok(palette) => {
                palettes.insert(member.number, palette);
            }
            Err(err) => warn!("palette member {}: {err}", member.number),
        }
    }
    palettes
}

/// What one member decoded to.
#[derive(Clone, Debug)]
pub enum MemberAsset {
    Bitmap {
        info: BitmapInfo,
        pixels: DecodedBitmap,
    },
    Sound(SoundData),
    /// Non-bitmap, non-sound members expose id, name and type only.
    Metadata,
}

#[derive(Clone, Debug)]
pub struct DecodedMember<'a> {
    pub member: &'a CastMember,
    pub asset: MemberAsset,
}

/// One skipped member and why, for the end-of-run summary.
#[derive(Debug)]
pub struct MemberFailure {
    pub number: u32,
    pub name: Option<String>,
    pub error: ShockError,
}

/// Success/failure tally for a batch decode; failed members carry a
/// message each so nothing is dropped silently.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub bitmaps: usize,
    pub sounds: usize,
    pub passed_through: usize,
    pub failures: Vec<MemberFailure>,
}

/// Batch decode result: per-member assets plus the summary report.
pub struct ExtractOutcome<'a> {
    pub assets: Vec<DecodedMember<'a>>,
    pub report: DecodeReport,
}
