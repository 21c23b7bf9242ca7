//! Sidecar persistence
//!
//! Stores a finished [`RecordIndex`] next to the data file so later readers
//! can skip the scan.
//!
//! ## File Format
//! ```text
//! ┌──────────┬─────────────┬──────────┬──────────────┬──────────────────┐
//! │Magic (4) │ Version (2) │ CRC (4)  │ Length (8)   │ bincode payload  │
//! │ "RIDX"   │   u16 LE    │  u32 LE  │   u64 LE     │                  │
//! └──────────┴─────────────┴──────────┴──────────────┴──────────────────┘
//! ```
//! The CRC covers the payload only.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{IndexError, Result};

use super::RecordIndex;

/// Magic bytes identifying a recindex sidecar file
pub const SIDECAR_MAGIC: &[u8; 4] = b"RIDX";

/// Current sidecar format version
pub const SIDECAR_VERSION: u16 = 1;

/// Magic (4) + Version (2) + CRC (4) + Length (8) = 18 bytes
const HEADER_SIZE: usize = 18;

impl RecordIndex {
    /// Write this index to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let payload = bincode::serialize(self)?;
        let crc = crc32fast::hash(&payload);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(SIDECAR_MAGIC)?;
        writer.write_all(&SIDECAR_VERSION.to_le_bytes())?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        writer.write_all(&payload)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            IndexError::Sidecar(format!("Failed to flush sidecar: {}", e))
        })?;
        file.sync_all()?;

        tracing::debug!(
            path = %path.display(),
            records = self.record_count(),
            bytes = HEADER_SIZE + payload.len(),
            "sidecar written"
        );
        Ok(())
    }

    /// Read and verify an index written by [`RecordIndex::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| IndexError::from_open(path, e))?;
        Self::decode_sidecar(&bytes)
    }

    fn decode_sidecar(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(IndexError::Sidecar(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[0..4] != SIDECAR_MAGIC {
            return Err(IndexError::Sidecar(format!(
                "Invalid magic: expected RIDX, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SIDECAR_VERSION {
            return Err(IndexError::Sidecar(format!(
                "Unsupported sidecar version: {}",
                version
            )));
        }

        let expected_crc = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&bytes[10..HEADER_SIZE]);
        let payload_len = u64::from_le_bytes(len_bytes);

        let payload = &bytes[HEADER_SIZE..];
        if payload.len() as u64 != payload_len {
            return Err(IndexError::Sidecar(format!(
                "Payload length mismatch: header says {}, file has {}",
                payload_len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(IndexError::Sidecar(format!(
                "CRC mismatch: expected {:#010x}, got {:#010x}",
                expected_crc, actual_crc
            )));
        }

        let index: RecordIndex = bincode::deserialize(payload)?;
        if index.offsets.as_slice().windows(2).any(|w| w[1] < w[0]) {
            return Err(IndexError::Sidecar("Offsets are not ordered".to_string()));
        }
        Ok(index)
    }
}
