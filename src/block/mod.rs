//! Block Container Module
//!
//! Decoding of elephant-bird style binary block files.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Marker (16)                                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Block Length: i32 LE (4)   bytes until the next marker      │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Header                                                      │
//! │   [Key (1)][Version varint = 1]                             │
//! │   [Key (1)][NameLen varint][Class Name (≤ 1023)]            │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Records                                                     │
//! │   [Key (1)][RecordLen varint][Record Bytes]                 │
//! │   ... repeated until Block Length is consumed ...           │
//! └─────────────────────────────────────────────────────────────┘
//!   ... next Marker, repeated for each block ...
//! ```
//!
//! A record's offset is the position of its first payload byte, taken after
//! the key and length prefix have been consumed.

mod decoder;
mod header;
mod marker;
mod records;
mod source;

pub use decoder::{FieldKey, WireType, MAX_VARINT_BYTES};
pub use header::{read_block_header, BlockFrame, BlockHeader};
pub use marker::{consume_marker, MarkerMatch};
pub use records::BlockRecords;
pub use source::ByteSource;

// =============================================================================
// Shared Constants (used by decoder, marker, header, records)
// =============================================================================

/// Length of the block marker in bytes
pub const MARKER_LEN: usize = 16;

/// Elephant-bird's known-good position marker, written before every block
pub const MARKER: [u8; MARKER_LEN] = [
    0x29, 0xd8, 0xd5, 0x06, 0x58, 0xcd, 0x4c, 0x29,
    0xb2, 0xbc, 0x57, 0x99, 0x21, 0x71, 0xbd, 0xff,
];

/// The only supported block header version
pub const BLOCK_VERSION: i32 = 1;
