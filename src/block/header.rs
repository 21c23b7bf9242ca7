//! Block header parser
//!
//! Consumes the length field and header that follow a marker.

use std::io::{Read, Seek};

use crate::config::{EmptyBlockPolicy, IndexerConfig};
use crate::error::{IndexError, Result};

use super::{ByteSource, WireType, BLOCK_VERSION};

/// A parsed block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Offset of the block length field
    pub offset: u64,
    /// Declared byte count of header plus records
    pub length: i32,
    /// Absolute offset where the block's records end
    pub end: u64,
    /// Header format version (always 1 once parsed)
    pub version: i32,
    /// Payload class name recorded by the producer
    pub class_name: String,
}

/// What follows a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockFrame {
    /// No length field could be read: end of stream
    End,

    /// Non-positive length; the block holds no records
    Empty { offset: u64, length: i32 },

    /// A well-formed header; records run until `header.end`
    Header(BlockHeader),
}

/// Parse the block that starts at the cursor (right after a marker)
pub fn read_block_header<R: Read + Seek>(
    source: &mut ByteSource<R>,
    config: &IndexerConfig,
) -> Result<BlockFrame> {
    let offset = source.position();
    let length = match source.read_fixed_int32_le()? {
        Some(length) => length,
        None => return Ok(BlockFrame::End),
    };

    if length <= 0 {
        return match config.empty_block_policy {
            EmptyBlockPolicy::Skip => Ok(BlockFrame::Empty { offset, length }),
            EmptyBlockPolicy::Reject => Err(IndexError::EmptyBlock { offset }),
        };
    }

    // Widening cast: length is positive here
    let end = source.position() + length as u64;

    let key_offset = source.position();
    source
        .read_tag_and_wiretype()?
        .require(WireType::Varint, key_offset, "version field")?;

    let version_offset = source.position();
    let version = source.read_varint_i32(config.varint_mode)?;
    if version != BLOCK_VERSION {
        return Err(IndexError::UnsupportedVersion {
            offset: version_offset,
            version,
        });
    }

    let key_offset = source.position();
    source
        .read_tag_and_wiretype()?
        .require(WireType::LengthDelimited, key_offset, "class name field")?;
    let class_name =
        source.read_length_prefixed_string(config.max_class_name_len, config.varint_mode)?;

    if source.position() > end {
        return Err(IndexError::malformed(
            offset,
            format!(
                "header ends at {} but block length {} ends at {}",
                source.position(),
                length,
                end
            ),
        ));
    }

    Ok(BlockFrame::Header(BlockHeader {
        offset,
        length,
        end,
        version,
        class_name,
    }))
}
