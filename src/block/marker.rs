//! Marker scanner
//!
//! Locates the 16-byte block marker, either at the exact cursor position or
//! by sliding one byte at a time until it reappears.

use std::io::{Read, Seek};

use crate::error::Result;

use super::{ByteSource, MARKER, MARKER_LEN};

/// Outcome of a marker scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMatch {
    /// Marker consumed; the cursor sits on the first byte after it
    Found {
        /// Bytes discarded before the marker was seen
        skipped: u64,
    },

    /// The bytes at the cursor are not a marker and resync was disabled
    Mismatch,

    /// The stream ended before a marker was seen
    Exhausted,
}

impl MarkerMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, MarkerMatch::Found { .. })
    }
}

/// Consume the next marker from `source`
///
/// With `allow_resync` unset only the 16 bytes at the cursor are checked,
/// which is how format detection probes offset 0. With it set, mismatching
/// bytes are dropped one at a time until a marker or end of stream.
pub fn consume_marker<R: Read + Seek>(
    source: &mut ByteSource<R>,
    allow_resync: bool,
) -> Result<MarkerMatch> {
    let start = source.position();
    let mut window = [0u8; MARKER_LEN];
    if source.read_up_to(&mut window)? < MARKER_LEN {
        return Ok(MarkerMatch::Exhausted);
    }

    let mut skipped: u64 = 0;
    loop {
        if window == MARKER {
            if skipped > 0 {
                tracing::warn!(
                    offset = start,
                    skipped,
                    "resynchronized on block marker"
                );
            }
            return Ok(MarkerMatch::Found { skipped });
        }

        if !allow_resync {
            return Ok(MarkerMatch::Mismatch);
        }

        window.copy_within(1.., 0);
        match source.read_u8()? {
            Some(byte) => {
                window[MARKER_LEN - 1] = byte;
                skipped += 1;
            }
            None => {
                tracing::debug!(
                    offset = start,
                    scanned = skipped + MARKER_LEN as u64,
                    "no further block marker"
                );
                return Ok(MarkerMatch::Exhausted);
            }
        }
    }
}
