//! Error types for recindex
//!
//! Provides a unified error type for all indexing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using IndexError
pub type Result<T> = std::result::Result<T, IndexError>;

/// Unified error type for recindex operations
///
/// Every variant is terminal for the indexing call that produced it; no
/// partially filled offset table is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum IndexError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Decoding Errors
    // -------------------------------------------------------------------------
    #[error("Truncated input at offset {offset}: stream ended while reading {context}")]
    TruncatedInput { offset: u64, context: &'static str },

    #[error("Malformed block header at offset {offset}: {reason}")]
    MalformedHeader { offset: u64, reason: String },

    #[error("Unsupported block format version {version} at offset {offset} (expected 1)")]
    UnsupportedVersion { offset: u64, version: i32 },

    #[error("Varint at offset {offset} does not fit in 32 bits")]
    VarintOverflow { offset: u64 },

    #[error("Block at offset {offset} declares a non-positive length")]
    EmptyBlock { offset: u64 },

    // -------------------------------------------------------------------------
    // Line Mode Errors
    // -------------------------------------------------------------------------
    #[error("File of {len} bytes does not end with a newline")]
    UnterminatedFile { len: u64 },

    // -------------------------------------------------------------------------
    // Sidecar Errors
    // -------------------------------------------------------------------------
    #[error("Sidecar index error: {0}")]
    Sidecar(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IndexError {
    /// Raw OS error code for I/O failures, if the OS reported one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            IndexError::Io(e) => e.raw_os_error(),
            IndexError::NotFound { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Map an open failure, keeping ENOENT distinct from other I/O errors.
    pub(crate) fn from_open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IndexError::NotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            IndexError::Io(source)
        }
    }

    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        IndexError::MalformedHeader {
            offset,
            reason: reason.into(),
        }
    }
}

impl From<bincode::Error> for IndexError {
    fn from(e: bincode::Error) -> Self {
        IndexError::Serialization(e.to_string())
    }
}
