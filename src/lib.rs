//! # recindex
//!
//! Record-offset indexing for flat files, with:
//! - Automatic detection of line-delimited text vs binary block containers
//! - Elephant-bird style block decoding with marker resynchronization
//! - Chunked newline scanning for text files
//! - Checksummed sidecar persistence of finished indexes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Indexer                              │
//! │              (open file, detect format, drive)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Block    │          │    Line     │
//!   │ marker/hdr/ │          │   Scanner   │
//!   │   records   │          │  (chunked)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │ Offset Table  │
//!              └───────────────┘
//! ```
//!
//! Record `i` of an index occupies `[offsets[i], offsets[i + 1])`.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod block;
pub mod line;
pub mod indexer;
pub mod fsops;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IndexError, Result};
pub use config::IndexerConfig;
pub use indexer::{detect_format, index_offsets, Indexer};
pub use table::{Format, IndexStats, RecordIndex, RecordOffsets};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of recindex
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
