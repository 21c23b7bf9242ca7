//! Chunked newline scanner

use std::io::{self, Read};

use memchr::memchr_iter;

use crate::error::{IndexError, Result};
use crate::table::OffsetTable;

/// Scan `reader` to the end, appending record starts and the closing sentinel
///
/// Returns the total byte count. Fails with `UnterminatedFile` when the last
/// byte is not `\n`, including for an empty stream.
pub fn scan_lines<R: Read>(
    reader: &mut R,
    table: &mut OffsetTable,
    chunk_size: usize,
) -> Result<u64> {
    table.append(0);

    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    let mut after_newline = false;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        after_newline = scan_chunk(&buf[..n], total, after_newline, table);
        total += n as u64;
    }

    if !after_newline {
        return Err(IndexError::UnterminatedFile { len: total });
    }

    table.append(total);
    Ok(total)
}

/// Append the record starts found in one non-empty chunk
///
/// `after_newline` says whether the byte before `chunk` was `\n`.
/// Returns whether the chunk itself ends with `\n`.
fn scan_chunk(chunk: &[u8], base: u64, after_newline: bool, table: &mut OffsetTable) -> bool {
    if after_newline && chunk[0] != b'\n' {
        table.append(base);
    }

    for pos in memchr_iter(b'\n', chunk) {
        if let Some(&next) = chunk.get(pos + 1) {
            if next != b'\n' {
                table.append(base + pos as u64 + 1);
            }
        }
    }

    chunk.last() == Some(&b'\n')
}
