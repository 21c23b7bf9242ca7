//! Positioned byte source
//!
//! Buffered reader that tracks the absolute cursor without seek syscalls.

use std::io::{self, BufReader, Read, Seek, SeekFrom};

use crate::error::Result;

/// Buffered reader with an absolute cursor
///
/// The cursor only moves forward, except through [`ByteSource::rewind`].
pub struct ByteSource<R> {
    inner: BufReader<R>,
    position: u64,
    /// Total stream length, learned on first use
    len: Option<u64>,
}

impl<R: Read + Seek> ByteSource<R> {
    /// Wrap `inner`, assumed to be positioned at offset 0
    pub fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            position: 0,
            len: None,
        }
    }

    /// Current absolute read position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the underlying stream
    ///
    /// Measured once by seeking to the end and back; the cursor is unchanged.
    pub fn stream_len(&mut self) -> Result<u64> {
        if let Some(len) = self.len {
            return Ok(len);
        }
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(self.position))?;
        self.len = Some(len);
        Ok(len)
    }

    /// Read a single byte, `None` at end of stream
    pub fn read_u8(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read_up_to(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Fill as much of `buf` as the stream allows
    ///
    /// Returns the number of bytes read; less than `buf.len()` only at end of stream.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Advance the cursor by `n` bytes without reading them
    ///
    /// Seeking past the end of the stream is allowed; the next read then
    /// reports end of stream.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        let target = self.position.saturating_add(n);
        match i64::try_from(n) {
            Ok(delta) => self.inner.seek_relative(delta)?,
            Err(_) => {
                self.inner.seek(SeekFrom::Start(target))?;
            }
        }
        self.position = target;
        Ok(())
    }

    /// Return to offset 0
    pub fn rewind(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.position = 0;
        Ok(())
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}
