//! recindex CLI
//!
//! Builds, inspects and persists record-offset indexes.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recindex::config::{EmptyBlockPolicy, VarintMode};
use recindex::fsops;
use recindex::{Indexer, IndexerConfig, RecordIndex};
use tracing_subscriber::{fmt, EnvFilter};

/// recindex
#[derive(Parser, Debug)]
#[command(name = "recindex")]
#[command(about = "Record-offset indexer for text and elephant-bird block files")]
#[command(version)]
struct Args {
    /// Line-mode read chunk size in bytes
    #[arg(long, default_value = "8192", global = true)]
    chunk_size: usize,

    /// Keep the low 32 bits of oversized varints instead of failing
    #[arg(long, global = true)]
    wrapping_varints: bool,

    /// Fail on blocks with a non-positive length instead of skipping them
    #[arg(long, global = true)]
    reject_empty_blocks: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Index a data file
    Index {
        /// File to index
        path: PathBuf,

        /// Write the finished index to this sidecar file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Print every offset, one per line
        #[arg(short, long)]
        print: bool,
    },

    /// Summarize a sidecar written by `index --save`
    Show {
        /// Sidecar file
        sidecar: PathBuf,

        /// Print every offset, one per line
        #[arg(short, long)]
        print: bool,
    },

    /// Total size of the regular files in a directory
    Dirsize {
        /// Directory to measure
        dir: PathBuf,
    },

    /// Create a hard link
    Link {
        src: PathBuf,
        dst: PathBuf,
    },

    /// Create a symbolic link
    Symlink {
        src: PathBuf,
        dst: PathBuf,
    },
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info,recindex=debug";

fn main() {
    // Initialize tracing/logging; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(args: Args) -> recindex::Result<i32> {
    let config = IndexerConfig::builder()
        .read_chunk_size(args.chunk_size)
        .varint_mode(if args.wrapping_varints {
            VarintMode::Wrapping
        } else {
            VarintMode::Strict
        })
        .empty_block_policy(if args.reject_empty_blocks {
            EmptyBlockPolicy::Reject
        } else {
            EmptyBlockPolicy::Skip
        })
        .build();

    match args.command {
        Commands::Index { path, save, print } => {
            let indexer = Indexer::new(config)?;
            let index = indexer.index_path(&path)?;
            print_summary(&index, print);

            if let Some(sidecar) = save {
                index.save(&sidecar)?;
                tracing::info!("Sidecar written to {}", sidecar.display());
            }
            Ok(0)
        }
        Commands::Show { sidecar, print } => {
            let index = RecordIndex::load(&sidecar)?;
            print_summary(&index, print);
            Ok(0)
        }
        Commands::Dirsize { dir } => {
            println!("{}", fsops::directory_size(&dir)?);
            Ok(0)
        }
        Commands::Link { src, dst } => Ok(report_status("link", fsops::create_hard_link(&src, &dst))),
        Commands::Symlink { src, dst } => {
            Ok(report_status("symlink", fsops::create_symlink(&src, &dst)))
        }
    }
}

fn print_summary(index: &RecordIndex, print_offsets: bool) {
    println!("format:  {}", index.format);
    println!("records: {}", index.record_count());
    println!("end:     {}", index.offsets.end().unwrap_or(0));
    if index.stats.blocks > 0 || index.stats.empty_blocks > 0 {
        println!("blocks:  {} ({} empty)", index.stats.blocks, index.stats.empty_blocks);
    }
    if index.stats.skipped_bytes > 0 {
        println!("skipped: {} bytes", index.stats.skipped_bytes);
    }
    if print_offsets {
        for offset in &index.offsets {
            println!("{}", offset);
        }
    }
}

fn report_status(op: &str, status: i32) -> i32 {
    if status == 0 {
        return 0;
    }
    tracing::error!("{} failed with OS error {}", op, status);
    1
}
