use alloc::string::String;
use enough::StopReason;

use crate::fourcc::FourCc;

/// Errors from Director container parsing and member decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShockError {
    /// The leading `RIFX`/`XFIR` marker is absent.
    #[error("unrecognized container magic bytes")]
    UnrecognizedFormat,

    /// The codec tag names a layout this crate does not read
    /// (e.g. afterburner-compressed movies).
    #[error("unsupported container variant: {0}")]
    UnsupportedVariant(String),

    /// The chunk directory contradicts itself (offsets past the end of
    /// the file, mismatched tags, impossible counts).
    #[error("inconsistent chunk directory: {0}")]
    InvalidDirectory(String),

    /// A fixed-layout record is malformed or shorter than its minimal
    /// known form.
    #[error("invalid record: {0}")]
    InvalidHeader(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A member's key-table entries contain no chunk of the needed type.
    /// Recoverable: callers skip the member.
    #[error("member {owner} owns no {fourcc} chunk")]
    MissingChunk { owner: u32, fourcc: FourCc },

    /// Bit depth outside {1, 4, 8, 16, 32}. Recoverable: callers skip
    /// the member.
    #[error("unsupported bitmap depth: {0}")]
    UnsupportedDepth(u16),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for ShockError {
    fn from(r: StopReason) -> Self {
        ShockError::Cancelled(r)
    }
}

impl ShockError {
    /// Whether this error is a per-member condition the batch walker
    /// records and moves past, rather than a container-level failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ShockError::MissingChunk { .. } | ShockError::UnsupportedDepth(_)
        )
    }
}
