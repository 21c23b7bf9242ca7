//! Offset Table Module
//!
//! Growable table of record start offsets and the finished, immutable index.
//!
//! ## Responsibilities
//! - Collect record start offsets while a scanner walks the file
//! - Grow in chunks so large files do not pay quadratic reallocation
//! - Trim to the exact count on finalize
//! - Persist a finished index as a checksummed sidecar file
//!
//! ## Layout
//! Record `i` occupies `[offsets[i], offsets[i + 1])`. The last entry is a
//! sentinel equal to the logical end of the scanned data, so a table with
//! `n` records holds `n + 1` offsets.

mod sidecar;
mod table;

use serde::{Deserialize, Serialize};

pub use sidecar::{SIDECAR_MAGIC, SIDECAR_VERSION};
pub use table::{OffsetTable, RecordOffsets};

/// Physical encoding detected for an indexed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// Newline-terminated text records
    Lines,

    /// Marker-delimited binary blocks of length-prefixed records
    Blocks,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Lines => f.write_str("lines"),
            Format::Blocks => f.write_str("blocks"),
        }
    }
}

/// Counters collected while scanning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Blocks whose header was parsed (block mode only)
    pub blocks: u64,

    /// Blocks skipped because of a non-positive length field
    pub empty_blocks: u64,

    /// Bytes discarded while resynchronizing on the marker
    pub skipped_bytes: u64,
}

/// A finished index over one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIndex {
    /// Which scanner produced the offsets
    pub format: Format,

    /// Record starts plus trailing sentinel
    pub offsets: RecordOffsets,

    /// Scan counters
    pub stats: IndexStats,
}

impl RecordIndex {
    /// Number of records in the index
    pub fn record_count(&self) -> usize {
        self.offsets.record_count()
    }
}
