//! Error handlers
//!
//! Logs errors and maps them to process exit codes.

use crate::error::types::{FsError, StorageError};
use log::error;

/// Exit code for configuration problems (EX_CONFIG)
pub const EXIT_CONFIG: i32 = 78;
/// Exit code for paths outside the sandbox (EX_NOPERM)
pub const EXIT_NOPERM: i32 = 77;
/// Exit code for violated preconditions (EX_DATAERR)
pub const EXIT_PRECONDITION: i32 = 65;
/// Exit code for failed OS calls (EX_IOERR)
pub const EXIT_IO: i32 = 74;

/// Handle an error at the top level
pub fn handle_error(err: &FsError) {
    match err {
        FsError::Storage(storage) => error!("[{}] {}", storage.code(), err),
        _ => error!("{}", err),
    }
}

/// Convert error to a process exit code
pub fn error_to_exit_code(err: &FsError) -> i32 {
    match err {
        FsError::Config(_) => EXIT_CONFIG,
        FsError::Io(_) => EXIT_IO,
        FsError::Storage(StorageError::Sandbox(_)) => EXIT_NOPERM,
        FsError::Storage(StorageError::NotOwner(_)) => EXIT_NOPERM,
        FsError::Storage(e) if e.is_operation_failure() => EXIT_IO,
        FsError::Storage(_) => EXIT_PRECONDITION,
    }
}
