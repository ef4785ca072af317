//! # shockbits
//!
//! Decoder for legacy Macromedia Director movie containers (`RIFX` /
//! `XFIR`): chunk directory, key table, cast member registry, and
//! bitmap decoding to RGBA.
//!
//! ## Corruption Tolerance
//!
//! Real-world movie files are frequently damaged or written by sloppy
//! producers. Container-level structure must be sound (magic, chunk
//! directory, key table), but everything per-member degrades instead of
//! failing: truncated pixel data zero-fills, overlong runs clamp,
//! out-of-range palette indexes render opaque black, and a member that
//! cannot be decoded is reported and skipped without disturbing its
//! neighbors.
//!
//! ## Supported Pixel Formats
//!
//! - 1/4/8-bit palette-indexed, MSB-first sub-byte packing
//! - 16-bit packed 1-5-5-5 with channel-separated rows and a white
//!   transparency key
//! - 32-bit planar alpha/red/green/blue rows
//!
//! ## Non-Goals
//!
//! - Score playback, scripting, or any runtime behavior
//! - Afterburner-compressed containers (`FGDM`/`FGDC`)
//! - Audio transcoding (sound payloads are located and framed, nothing
//!   more)
//!
//! ## Usage
//!
//! ```no_run
//! use shockbits::{DirectorFile, MemberAsset};
//! use enough::Unstoppable;
//!
//! let data: Vec<u8> = std::fs::read("movie.dir")?;
//! let movie = DirectorFile::load(data)?;
//!
//! let outcome = movie.decode_members(None, &Unstoppable)?;
//! for decoded in &outcome.assets {
//!     if let MemberAsset::Bitmap { info, pixels } = &decoded.asset {
//!         println!(
//!             "{}: {}x{} at {} bpp",
//!             decoded.member.number, pixels.width, pixels.height, info.bit_depth
//!         );
//!     }
//! }
//! for failure in &outcome.report.failures {
//!     eprintln!("skipped member {}: {}", failure.number, failure.error);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bitmap;
mod cast;
mod config;
mod cursor;
mod error;
mod file;
mod fourcc;
mod key_table;
mod limits;
mod palette;
mod rifx;
mod sound;

// Re-exports
pub use bitmap::{decode_bitmap_data, scan_width, BitmapInfo, DecodedBitmap};
pub use cast::{CastMember, MemberType};
pub use config::MovieConfig;
pub use cursor::Endian;
pub use enough::{Stop, Unstoppable};
pub use error::ShockError;
pub use file::{
    DecodeReport, DecodedMember, DirectorFile, ExtractOutcome, MemberAsset, MemberFailure,
};
pub use fourcc::{ChunkKind, FourCc};
pub use key_table::{KeyTable, KeyTableEntry};
pub use limits::Limits;
pub use palette::Palette;
pub use rifx::{ChunkContainer, ChunkSlice};
pub use sound::SoundData;
