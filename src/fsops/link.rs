//! Link creation
//!
//! Both functions return 0 on success and the raw OS error code otherwise.

use std::io;
use std::path::Path;

/// Status for errors that carry no OS code
const UNKNOWN_ERROR: i32 = -1;

fn status(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = %e, "link creation failed");
            e.raw_os_error().unwrap_or(UNKNOWN_ERROR)
        }
    }
}

/// Create a hard link `dst` pointing at `src`
pub fn create_hard_link(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> i32 {
    status(std::fs::hard_link(src, dst))
}

/// Create a symbolic link `dst` pointing at `src`
pub fn create_symlink(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> i32 {
    #[cfg(unix)]
    {
        status(std::os::unix::fs::symlink(src, dst))
    }
    #[cfg(windows)]
    {
        status(std::os::windows::fs::symlink_file(src, dst))
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (src, dst);
        UNKNOWN_ERROR
    }
}
