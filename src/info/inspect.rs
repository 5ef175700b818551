//! Path inspection
//!
//! Read-only queries about a sandboxed path: owner, group, mode and disk space.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::error::{FsAction, StorageError};
use crate::info::disk::query_disk_space;
use crate::info::identity::{is_owner_or_root, lookup_group, lookup_user};
use crate::info::mode::{mode_to_octal, mode_to_symbolic};
use crate::info::results::{DiskSpace, GroupInfo, OwnerInfo, PermissionInfo};
use crate::sandbox::normalize::parent_path;
use crate::storage::validation::require_parent_traversable;
use crate::storage::{Storage, op_error};

impl Storage {
    /// Gets the total, free and used disk space of the filesystem holding `path`
    pub fn disk_space(&self, path: &str) -> Result<DiskSpace, StorageError> {
        let path = self.check(path)?;
        query_disk_space(&path)
    }

    /// Parent must be traversable and the path must exist
    fn inspect_metadata(&self, path: &str) -> Result<(String, fs::Metadata), StorageError> {
        let path = self.check(path)?;

        require_parent_traversable(&parent_path(&path))?;
        if !Path::new(&path).exists() {
            return Err(StorageError::PathNotFound(path));
        }

        let metadata =
            fs::metadata(&path).map_err(|e| op_error(FsAction::Metadata, &path, e))?;
        Ok((path, metadata))
    }

    /// Gets info about the user owning `path`
    pub fn path_owner(&self, path: &str) -> Result<OwnerInfo, StorageError> {
        let (path, metadata) = self.inspect_metadata(path)?;
        lookup_user(metadata.uid(), &path)
    }

    /// Gets info about the group owning `path`
    pub fn path_group(&self, path: &str) -> Result<GroupInfo, StorageError> {
        let (path, metadata) = self.inspect_metadata(path)?;
        lookup_group(metadata.gid(), &path)
    }

    /// Whether the process is root or the owner of `path`
    pub fn has_owner_rights(&self, path: &str) -> Result<bool, StorageError> {
        let (_, metadata) = self.inspect_metadata(path)?;
        Ok(is_owner_or_root(metadata.uid()))
    }

    /// Gets the mode of `path` as a 4-digit octal string or a 10-character symbolic string.
    ///
    /// Symbolic links report their own mode (`l...`), not their target's.
    pub fn path_mode(&self, path: &str, octal: bool) -> Result<String, StorageError> {
        let (path, _) = self.inspect_metadata(path)?;
        let mode = fs::symlink_metadata(&path)
            .map_err(|e| op_error(FsAction::Metadata, &path, e))?
            .mode();

        Ok(if octal {
            mode_to_octal(mode)
        } else {
            mode_to_symbolic(mode)
        })
    }

    /// Gets owner name, group name and mode of `path`
    pub fn path_permissions(&self, path: &str) -> Result<PermissionInfo, StorageError> {
        let owner = self.path_owner(path)?;
        let group = self.path_group(path)?;

        Ok(PermissionInfo {
            owner: owner.name,
            group: group.name,
            mode: self.path_mode(path, false)?,
            mode_octal: self.path_mode(path, true)?,
        })
    }
}
