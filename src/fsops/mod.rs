//! Filesystem Helpers
//!
//! Thin wrappers over the OS used by dataset tooling around the indexer.
//!
//! ## Responsibilities
//! - Hard and symbolic link creation, reporting raw status codes
//! - Directory size accounting that tolerates files vanishing mid-scan

mod dirsize;
mod link;

pub use dirsize::{directory_size, sum_file_sizes};
pub use link::{create_hard_link, create_symlink};
