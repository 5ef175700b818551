//! Disk space

use nix::sys::statvfs::statvfs;

use crate::error::{FsAction, StorageError};
use crate::info::results::DiskSpace;

/// Path queried when the caller has no particular filesystem in mind
pub const DEFAULT_DISK_SPACE_PATH: &str = "/";

/// Query the filesystem containing `path`. Free space is what an unprivileged
/// process can still allocate.
pub fn query_disk_space(path: &str) -> Result<DiskSpace, StorageError> {
    let stats = statvfs(path)
        .map_err(|errno| StorageError::operation(FsAction::DiskSpace, path, errno.into()))?;

    let fragment = stats.fragment_size() as u64;
    let total = (stats.blocks() as u64).saturating_mul(fragment);
    let free = (stats.blocks_available() as u64).saturating_mul(fragment);

    Ok(DiskSpace::new(total, free))
}
