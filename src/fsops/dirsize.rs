//! Directory size accounting

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sum the sizes of the regular files directly inside `dir`
///
/// Subdirectories and symlinks are not followed. A file removed between
/// listing and stat contributes 0 bytes; any other failure propagates.
pub fn directory_size(dir: impl AsRef<Path>) -> Result<u64> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        if file_type.is_file() {
            files.push(entry.path());
        }
    }

    let total = sum_file_sizes(&files)?;
    tracing::debug!(dir = %dir.display(), files = files.len(), total, "directory size");
    Ok(total)
}

/// Sum the sizes of already-listed files, counting missing ones as 0
pub fn sum_file_sizes<P: AsRef<Path>>(files: &[P]) -> Result<u64> {
    let mut total: u64 = 0;
    for path in files {
        match fs::metadata(path.as_ref()) {
            Ok(meta) => total += meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.as_ref().display(), "file vanished before stat");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(total)
}
