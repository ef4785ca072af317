//! Sound member boundary.
//!
//! Audio transcoding is external; the pipeline only locates a sound
//! member's data chunk and reports its framing so a transcoder knows
//! what it is holding: `ediM` chunks carry an MP3 elementary stream,
//! `snd ` chunks carry PCM in Mac sound-resource framing.

use alloc::vec::Vec;

use crate::fourcc::FourCc;

/// A sound member's payload, handed to an external transcoder untouched.
#[derive(Clone, Debug)]
pub struct SoundData {
    /// Raw chunk payload bytes.
    pub data: Vec<u8>,
    /// True for MP3 framing (`ediM`), false for PCM (`snd `).
    pub is_mp3: bool,
}

impl SoundData {
    pub(crate) fn from_chunk(tag: FourCc, data: &[u8]) -> SoundData {
        SoundData {
            data: data.to_vec(),
            is_mp3: tag == FourCc::SOUND_MP3,
        }
    }
}
