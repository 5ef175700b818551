//! File permissions
//!
//! Access checks for the calling process, answered by the kernel via `access(2)`.

use nix::unistd::{AccessFlags, access};
use std::path::Path;

fn has_access(path: &Path, flags: AccessFlags) -> bool {
    access(path, flags).is_ok()
}

/// Check if path is readable
pub fn is_readable(path: impl AsRef<Path>) -> bool {
    has_access(path.as_ref(), AccessFlags::R_OK)
}

/// Check if path is writable
pub fn is_writable(path: impl AsRef<Path>) -> bool {
    has_access(path.as_ref(), AccessFlags::W_OK)
}

/// Check if path is executable (traversable, for directories)
pub fn is_executable(path: impl AsRef<Path>) -> bool {
    has_access(path.as_ref(), AccessFlags::X_OK)
}
