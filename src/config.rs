//! Configuration for recindex
//!
//! Centralized indexer configuration with sensible defaults.

use crate::error::{IndexError, Result};

/// Configuration for an [`Indexer`](crate::Indexer)
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    // -------------------------------------------------------------------------
    // I/O Configuration
    // -------------------------------------------------------------------------
    /// Chunk size for line-mode reads (in bytes)
    pub read_chunk_size: usize,

    /// Capacity of the buffered reader used in block mode (in bytes)
    pub buffer_capacity: usize,

    // -------------------------------------------------------------------------
    // Offset Table Configuration
    // -------------------------------------------------------------------------
    /// Minimum number of entries the offset table grows by at once
    pub table_growth: usize,

    // -------------------------------------------------------------------------
    // Block Format Configuration
    // -------------------------------------------------------------------------
    /// Size of the class-name buffer, terminator included.
    /// Class names may be at most `max_class_name_len - 1` bytes.
    pub max_class_name_len: usize,

    /// How varints wider than 32 bits are handled
    pub varint_mode: VarintMode,

    /// What to do with blocks whose length field is zero or negative
    pub empty_block_policy: EmptyBlockPolicy,
}

/// Varint decoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarintMode {
    /// Fail with `VarintOverflow` when a value exceeds `i32::MAX`
    #[default]
    Strict,

    /// Truncate to the low 32 bits, as legacy elephant-bird readers do
    Wrapping,
}

/// Handling of blocks with a non-positive length field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyBlockPolicy {
    /// Treat the block as empty and continue with the next marker
    #[default]
    Skip,

    /// Fail the scan with `EmptyBlock`
    Reject,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: 8 * 1024,   // 8 KiB
            buffer_capacity: 64 * 1024,  // 64 KiB
            table_growth: 4096,
            max_class_name_len: 1024,
            varint_mode: VarintMode::Strict,
            empty_block_policy: EmptyBlockPolicy::Skip,
        }
    }
}

impl IndexerConfig {
    /// Create a new config builder
    pub fn builder() -> IndexerConfigBuilder {
        IndexerConfigBuilder::default()
    }

    /// Reject configurations that cannot make progress
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            return Err(IndexError::Config("read_chunk_size must be positive".to_string()));
        }
        if self.buffer_capacity == 0 {
            return Err(IndexError::Config("buffer_capacity must be positive".to_string()));
        }
        if self.table_growth == 0 {
            return Err(IndexError::Config("table_growth must be positive".to_string()));
        }
        if self.max_class_name_len < 2 {
            return Err(IndexError::Config(format!(
                "max_class_name_len must be at least 2, got {}",
                self.max_class_name_len
            )));
        }
        Ok(())
    }
}

/// Builder for IndexerConfig
#[derive(Default)]
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl IndexerConfigBuilder {
    /// Set the line-mode read chunk size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Set the block-mode reader buffer capacity (in bytes)
    pub fn buffer_capacity(mut self, size: usize) -> Self {
        self.config.buffer_capacity = size;
        self
    }

    /// Set the minimum offset table growth step (in entries)
    pub fn table_growth(mut self, entries: usize) -> Self {
        self.config.table_growth = entries;
        self
    }

    /// Set the class-name buffer size, terminator included
    pub fn max_class_name_len(mut self, len: usize) -> Self {
        self.config.max_class_name_len = len;
        self
    }

    /// Set the varint decoding mode
    pub fn varint_mode(mut self, mode: VarintMode) -> Self {
        self.config.varint_mode = mode;
        self
    }

    /// Set the policy for non-positive block lengths
    pub fn empty_block_policy(mut self, policy: EmptyBlockPolicy) -> Self {
        self.config.empty_block_policy = policy;
        self
    }

    pub fn build(self) -> IndexerConfig {
        self.config
    }
}
