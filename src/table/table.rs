//! Offset table implementation
//!
//! Vec-backed append-only table with chunked growth and an exact-size finalize.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Default minimum growth step (in entries)
const DEFAULT_GROWTH: usize = 4096;

/// Growable, append-only table of record offsets
///
/// Owned by a single indexing call; converted into [`RecordOffsets`]
/// once the scan is complete.
#[derive(Debug)]
pub struct OffsetTable {
    offsets: Vec<u64>,
    /// Minimum number of slots added when the table is full
    growth: usize,
}

impl OffsetTable {
    /// Create an empty table with the default growth step
    pub fn new() -> Self {
        Self::with_growth(DEFAULT_GROWTH)
    }

    /// Create an empty table that grows by at least `growth` entries at a time
    pub fn with_growth(growth: usize) -> Self {
        let growth = growth.max(1);
        Self {
            offsets: Vec::with_capacity(growth),
            growth,
        }
    }

    /// Append an offset, amortized O(1)
    ///
    /// Capacity doubles once it exceeds the growth step, so a table of `n`
    /// entries reallocates O(log n) times.
    pub fn append(&mut self, offset: u64) {
        debug_assert!(
            self.offsets.last().map_or(true, |&last| offset >= last),
            "offsets must not decrease: {} after {:?}",
            offset,
            self.offsets.last()
        );

        if self.offsets.len() == self.offsets.capacity() {
            let step = self.offsets.capacity().max(self.growth);
            self.offsets.reserve_exact(step);
        }
        self.offsets.push(offset);
    }

    /// Number of offsets recorded so far
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Most recently appended offset
    pub fn last(&self) -> Option<u64> {
        self.offsets.last().copied()
    }

    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.offsets.capacity()
    }

    /// Trim storage to the recorded count and freeze the table
    pub fn finalize(self) -> RecordOffsets {
        RecordOffsets {
            offsets: self.offsets.into_boxed_slice(),
        }
    }
}

impl Default for OffsetTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable, finished offset table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOffsets {
    offsets: Box<[u64]>,
}

impl RecordOffsets {
    /// All offsets, sentinel included
    pub fn as_slice(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of offsets, sentinel included
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of records (one less than the offset count)
    pub fn record_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Byte range of record `i`: `[offsets[i], offsets[i + 1])`
    pub fn record_range(&self, i: usize) -> Option<Range<u64>> {
        let start = *self.offsets.get(i)?;
        let end = *self.offsets.get(i + 1)?;
        Some(start..end)
    }

    /// Byte ranges of all records, in order
    pub fn ranges(&self) -> impl Iterator<Item = Range<u64>> + '_ {
        self.offsets.windows(2).map(|w| w[0]..w[1])
    }

    /// The trailing sentinel (logical end of the scanned data)
    pub fn end(&self) -> Option<u64> {
        self.offsets.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.offsets.iter()
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.offsets.into_vec()
    }
}

impl AsRef<[u64]> for RecordOffsets {
    fn as_ref(&self) -> &[u64] {
        &self.offsets
    }
}

impl<'a> IntoIterator for &'a RecordOffsets {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.iter()
    }
}

impl From<RecordOffsets> for Vec<u64> {
    fn from(offsets: RecordOffsets) -> Self {
        offsets.into_vec()
    }
}
