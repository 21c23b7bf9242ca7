//! Block record iterator
//!
//! Walks the length-prefixed records of one block, yielding payload offsets.

use std::io::{Read, Seek};

use crate::config::VarintMode;
use crate::error::{IndexError, Result};

use super::{BlockHeader, ByteSource, WireType};

/// Iterator over record start offsets inside one block
///
/// Record bytes are skipped, never read. Iteration stops at the block end,
/// or after the first error.
pub struct BlockRecords<'a, R> {
    source: &'a mut ByteSource<R>,
    /// Stop once the cursor reaches this offset
    end: u64,
    mode: VarintMode,
    failed: bool,
}

impl<'a, R: Read + Seek> BlockRecords<'a, R> {
    /// Iterate the records of the block described by `header`
    ///
    /// `source` must be positioned right after the header.
    pub fn new(source: &'a mut ByteSource<R>, header: &BlockHeader, mode: VarintMode) -> Self {
        Self {
            source,
            end: header.end,
            mode,
            failed: false,
        }
    }

    fn next_record(&mut self) -> Result<u64> {
        let key_offset = self.source.position();
        self.source
            .read_tag_and_wiretype()?
            .require(WireType::LengthDelimited, key_offset, "record")?;

        let len_offset = self.source.position();
        let declared = self.source.read_varint_i32(self.mode)?;
        let len = u64::try_from(declared).map_err(|_| {
            IndexError::malformed(len_offset, format!("negative record length {}", declared))
        })?;

        let start = self.source.position();
        if start + len > self.end {
            return Err(IndexError::malformed(
                len_offset,
                format!(
                    "record of {} bytes at {} overruns block end {}",
                    len, start, self.end
                ),
            ));
        }

        if start + len > self.source.stream_len()? {
            return Err(IndexError::TruncatedInput {
                offset: start,
                context: "record payload",
            });
        }

        self.source.skip(len)?;
        Ok(start)
    }
}

impl<'a, R: Read + Seek> Iterator for BlockRecords<'a, R> {
    /// Absolute offset of the record's first payload byte
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.source.position() >= self.end {
            return None;
        }

        match self.next_record() {
            Ok(start) => Some(Ok(start)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
