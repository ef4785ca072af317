//! Byte cursor over an in-memory buffer.
//!
//! Container bodies come in both byte orders (`RIFX` vs `XFIR`), so the
//! cursor carries its order with it. Fixed-layout records that are
//! big-endian regardless of container order (bitmap info, movie config)
//! use [`Endian::Big`] explicitly.

use crate::error::ShockError;
use crate::fourcc::FourCc;

/// Byte order of multi-byte integer fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn set_position(&mut self, pos: usize) -> Result<(), ShockError> {
        if pos > self.data.len() {
            return Err(ShockError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), ShockError> {
        let new_pos = self.pos.checked_add(n).ok_or(ShockError::UnexpectedEof)?;
        self.set_position(new_pos)
    }

    pub fn read_u8(&mut self) -> Result<u8, ShockError> {
        let b = *self.data.get(self.pos).ok_or(ShockError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], ShockError> {
        let end = self.pos.checked_add(N).ok_or(ShockError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(ShockError::UnexpectedEof);
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(buf)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ShockError> {
        let end = self.pos.checked_add(n).ok_or(ShockError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(ShockError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u16(&mut self) -> Result<u16, ShockError> {
        let b = self.read_fixed_bytes::<2>()?;
        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes(b),
            Endian::Little => u16::from_le_bytes(b),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16, ShockError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ShockError> {
        let b = self.read_fixed_bytes::<4>()?;
        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes(b),
            Endian::Little => u32::from_le_bytes(b),
        })
    }

    /// Read a chunk tag. Tag bytes are stored reversed in little-endian
    /// containers; this normalizes them to their ASCII spelling.
    pub fn read_fourcc(&mut self) -> Result<FourCc, ShockError> {
        let raw = FourCc(self.read_fixed_bytes::<4>()?);
        Ok(match self.endian {
            Endian::Big => raw,
            Endian::Little => raw.swapped(),
        })
    }
}
