//! Line Scanner Module
//!
//! Indexes newline-terminated text files.
//!
//! ## Record Boundaries
//! A record starts at offset 0 and at every non-newline byte that follows a
//! `\n`. Runs of blank lines therefore stay attached to the record before
//! them. The file must end with `\n`.

mod scanner;

pub use scanner::scan_lines;
