//! Field decoder
//!
//! Protobuf-style primitives used by block headers and record framing:
//! single-byte field keys, base-128 varints, length-prefixed strings and
//! the little-endian block length.

use std::io::{Read, Seek};

use crate::config::VarintMode;
use crate::error::{IndexError, Result};

use super::ByteSource;

/// A varint never spans more than 10 bytes
pub const MAX_VARINT_BYTES: usize = 10;

/// Encoding kind carried in the low 3 bits of a field key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    /// Map the low 3 bits of a key byte; 6 and 7 are unassigned
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            3 => Some(WireType::StartGroup),
            4 => Some(WireType::EndGroup),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

/// A decoded single-byte field key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    /// Field number (bits 3..7)
    pub tag: u8,
    /// Encoding kind (bits 0..3)
    pub wire_type: WireType,
}

impl FieldKey {
    /// Decode a key byte read at `offset`
    ///
    /// Multi-byte keys never occur in this format, so a set continuation
    /// bit is malformed.
    pub fn decode(byte: u8, offset: u64) -> Result<Self> {
        if byte & 0x80 != 0 {
            return Err(IndexError::malformed(
                offset,
                format!("field key 0x{:02x} has the continuation bit set", byte),
            ));
        }
        let wire_type = WireType::from_bits(byte & 0x07).ok_or_else(|| {
            IndexError::malformed(offset, format!("field key 0x{:02x} has unknown wire type", byte))
        })?;
        Ok(Self {
            tag: (byte >> 3) & 0x0f,
            wire_type,
        })
    }

    /// Fail unless the key carries `expected` wire type
    pub(crate) fn require(self, expected: WireType, offset: u64, field: &str) -> Result<Self> {
        if self.wire_type != expected {
            return Err(IndexError::malformed(
                offset,
                format!(
                    "{} has wire type {:?}, expected {:?}",
                    field, self.wire_type, expected
                ),
            ));
        }
        Ok(self)
    }
}

impl<R: Read + Seek> ByteSource<R> {
    /// Read one field key byte
    pub fn read_tag_and_wiretype(&mut self) -> Result<FieldKey> {
        let offset = self.position();
        let byte = self.read_u8()?.ok_or(IndexError::TruncatedInput {
            offset,
            context: "field key",
        })?;
        FieldKey::decode(byte, offset)
    }

    /// Read a base-128 varint into an `i32`
    ///
    /// At most [`MAX_VARINT_BYTES`] bytes are consumed. Values wider than
    /// 31 bits fail in [`VarintMode::Strict`] and keep their low 32 bits in
    /// [`VarintMode::Wrapping`].
    pub fn read_varint_i32(&mut self, mode: VarintMode) -> Result<i32> {
        let offset = self.position();
        let mut value: u64 = 0;

        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?.ok_or(IndexError::TruncatedInput {
                offset: self.position(),
                context: "varint",
            })?;
            // The 10th group has room for only its lowest bit in a u64
            if i == MAX_VARINT_BYTES - 1 && mode == VarintMode::Strict && byte & 0x7e != 0 {
                return Err(IndexError::VarintOverflow { offset });
            }
            value |= u64::from(byte & 0x7f) << (7 * i);

            if byte & 0x80 == 0 {
                return match mode {
                    VarintMode::Strict => {
                        i32::try_from(value).map_err(|_| IndexError::VarintOverflow { offset })
                    }
                    VarintMode::Wrapping => Ok(value as u32 as i32),
                };
            }
        }

        Err(IndexError::malformed(
            offset,
            format!("varint longer than {} bytes", MAX_VARINT_BYTES),
        ))
    }

    /// Read a varint length followed by that many bytes
    ///
    /// `max_len` is the buffer size including a terminator, so the longest
    /// accepted string is `max_len - 1` bytes.
    pub fn read_length_prefixed_string(
        &mut self,
        max_len: usize,
        mode: VarintMode,
    ) -> Result<String> {
        let offset = self.position();
        let declared = self.read_varint_i32(mode)?;
        let len = usize::try_from(declared).map_err(|_| {
            IndexError::malformed(offset, format!("negative string length {}", declared))
        })?;

        if len >= max_len {
            return Err(IndexError::malformed(
                offset,
                format!(
                    "string of {} bytes exceeds limit of {}",
                    len,
                    max_len.saturating_sub(1)
                ),
            ));
        }

        let mut buf = vec![0u8; len];
        if self.read_up_to(&mut buf)? < len {
            return Err(IndexError::TruncatedInput {
                offset: self.position(),
                context: "length-prefixed string",
            });
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Read a 4-byte little-endian `i32`
    ///
    /// A short read is end of stream, not an error, and yields `None`.
    pub fn read_fixed_int32_le(&mut self) -> Result<Option<i32>> {
        let mut buf = [0u8; 4];
        if self.read_up_to(&mut buf)? < buf.len() {
            return Ok(None);
        }
        Ok(Some(i32::from_le_bytes(buf)))
    }
}
