//! Indexer Module
//!
//! Top-level driver: opens a file, detects its format and runs the matching
//! scanner into a fresh offset table.
//!
//! ## Responsibilities
//! - Probe offset 0 for the block marker and rewind
//! - Loop marker → header → records in block mode
//! - Stream newline scanning in line mode
//! - Index independent files on a worker pool

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::block::{consume_marker, read_block_header, BlockFrame, BlockRecords, ByteSource, MarkerMatch};
use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::line::scan_lines;
use crate::table::{Format, IndexStats, OffsetTable, RecordIndex, RecordOffsets};

/// Index a file with the default configuration
///
/// Returns the record start offsets followed by the closing sentinel.
pub fn index_offsets(path: impl AsRef<Path>) -> Result<RecordOffsets> {
    Indexer::default()
        .index_path(path.as_ref())
        .map(|index| index.offsets)
}

/// Decide the format of the stream at `source`
///
/// Only an exact marker at offset 0 selects block mode. The cursor is
/// rewound to 0 whatever the outcome.
pub fn detect_format<R: Read + Seek>(source: &mut ByteSource<R>) -> Result<Format> {
    let probe = consume_marker(source, false)?;
    source.rewind()?;
    Ok(if probe.is_found() {
        Format::Blocks
    } else {
        Format::Lines
    })
}

/// Record-offset indexer
///
/// Holds configuration only; every call owns its own file handle and table,
/// so one indexer can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    config: IndexerConfig,
}

impl Indexer {
    /// Create an indexer after validating `config`
    pub fn new(config: IndexerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Open and index the file at `path`
    pub fn index_path(&self, path: &Path) -> Result<RecordIndex> {
        let file = File::open(path).map_err(|e| IndexError::from_open(path, e))?;
        let index = self.index_reader(file)?;

        tracing::info!(
            path = %path.display(),
            format = %index.format,
            records = index.record_count(),
            end = index.offsets.end().unwrap_or(0),
            "indexed file"
        );
        Ok(index)
    }

    /// Index a seekable stream positioned at offset 0
    pub fn index_reader<R: Read + Seek>(&self, reader: R) -> Result<RecordIndex> {
        let mut source = ByteSource::new(reader, self.config.buffer_capacity);
        let format = detect_format(&mut source)?;
        let mut table = OffsetTable::with_growth(self.config.table_growth);

        let stats = match format {
            Format::Blocks => self.index_blocks(&mut source, &mut table)?,
            Format::Lines => {
                let mut reader = source.into_inner();
                scan_lines(&mut reader, &mut table, self.config.read_chunk_size)?;
                IndexStats::default()
            }
        };

        Ok(RecordIndex {
            format,
            offsets: table.finalize(),
            stats,
        })
    }

    /// Walk every block from the cursor, appending record starts and the sentinel
    fn index_blocks<R: Read + Seek>(
        &self,
        source: &mut ByteSource<R>,
        table: &mut OffsetTable,
    ) -> Result<IndexStats> {
        let mut stats = IndexStats::default();
        // End of the last parsed block; trailing garbage never moves it
        let mut end = source.position();

        loop {
            match consume_marker(source, true)? {
                MarkerMatch::Found { skipped } => stats.skipped_bytes += skipped,
                MarkerMatch::Mismatch | MarkerMatch::Exhausted => break,
            }

            let header = match read_block_header(source, &self.config)? {
                BlockFrame::End => break,
                BlockFrame::Empty { offset, length } => {
                    tracing::debug!(offset, length, "skipping empty block");
                    stats.empty_blocks += 1;
                    continue;
                }
                BlockFrame::Header(header) => header,
            };

            let mut records: u64 = 0;
            for start in BlockRecords::new(source, &header, self.config.varint_mode) {
                table.append(start?);
                records += 1;
            }

            stats.blocks += 1;
            end = source.position();

            tracing::debug!(
                offset = header.offset,
                length = header.length,
                class_name = %header.class_name,
                records,
                "indexed block"
            );
        }

        table.append(end);
        Ok(stats)
    }

    /// Index independent files on up to `workers` threads
    ///
    /// Results come back in the order of `paths`; one file failing does not
    /// affect the others.
    pub fn index_many<P>(&self, paths: &[P], workers: usize) -> Vec<Result<RecordIndex>>
    where
        P: AsRef<Path> + Sync,
    {
        if paths.is_empty() {
            return Vec::new();
        }
        let workers = workers.clamp(1, paths.len());

        let (job_tx, job_rx) = crossbeam::channel::unbounded::<usize>();
        let (result_tx, result_rx) = crossbeam::channel::unbounded();

        for i in 0..paths.len() {
            if job_tx.send(i).is_err() {
                break;
            }
        }
        drop(job_tx);

        let scope = crossbeam::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| {
                    for i in job_rx.iter() {
                        let result = self.index_path(paths[i].as_ref());
                        if result_tx.send((i, result)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        if let Err(panic) = scope {
            std::panic::resume_unwind(panic);
        }
        drop(result_tx);

        let mut results: Vec<(usize, Result<RecordIndex>)> = result_rx.iter().collect();
        results.sort_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
