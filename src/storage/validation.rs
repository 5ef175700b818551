//! Precondition checks
//!
//! Shared checks run by storage operations before they touch the filesystem.
//! Each returns the first violated precondition as a typed error.

use std::fs;
use std::path::Path;

use crate::error::StorageError;
use crate::storage::permissions::{is_executable, is_readable, is_writable};
use crate::storage::results::ContentKind;

/// Classify a file type without following links. Anything that is neither a
/// directory nor a link (fifos, sockets, devices) counts as a file.
pub fn kind_from_file_type(file_type: fs::FileType) -> ContentKind {
    if file_type.is_symlink() {
        ContentKind::Link
    } else if file_type.is_dir() {
        ContentKind::Directory
    } else {
        ContentKind::File
    }
}

/// Classify whatever sits at `path` without following a final symlink.
/// Returns `None` when nothing exists there.
pub fn entry_kind(path: &str) -> Option<ContentKind> {
    fs::symlink_metadata(path)
        .ok()
        .map(|metadata| kind_from_file_type(metadata.file_type()))
}

/// Whether `path` is a fifo, socket or device, without following links.
/// Such entries are listed as files but their content is never copied.
pub fn is_special_file(path: &str) -> bool {
    fs::symlink_metadata(path)
        .map(|metadata| {
            let file_type = metadata.file_type();
            !(file_type.is_file() || file_type.is_dir() || file_type.is_symlink())
        })
        .unwrap_or(false)
}

/// Whether anything at all exists at `path`, dangling links included
pub fn entry_exists(path: &str) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Directory exists at `path` (following links)
pub fn is_directory(path: &str) -> bool {
    Path::new(path).is_dir()
}

/// Regular file exists at `path` (following links)
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

pub fn require_directory(path: &str) -> Result<(), StorageError> {
    if is_directory(path) {
        Ok(())
    } else {
        Err(StorageError::DirectoryNotFound(path.to_string()))
    }
}

pub fn require_file(path: &str) -> Result<(), StorageError> {
    if is_file(path) {
        Ok(())
    } else {
        Err(StorageError::FileNotFound(path.to_string()))
    }
}

pub fn require_readable(path: &str) -> Result<(), StorageError> {
    if is_readable(path) {
        Ok(())
    } else {
        Err(StorageError::NotReadable(path.to_string()))
    }
}

pub fn require_writable(path: &str) -> Result<(), StorageError> {
    if is_writable(path) {
        Ok(())
    } else {
        Err(StorageError::NotWritable(path.to_string()))
    }
}

pub fn require_traversable(path: &str) -> Result<(), StorageError> {
    if is_executable(path) {
        Ok(())
    } else {
        Err(StorageError::NotTraversable(path.to_string()))
    }
}

pub fn require_parent_traversable(parent: &str) -> Result<(), StorageError> {
    if is_executable(parent) {
        Ok(())
    } else {
        Err(StorageError::ParentNotTraversable(parent.to_string()))
    }
}

pub fn require_parent_writable(parent: &str) -> Result<(), StorageError> {
    if is_writable(parent) {
        Ok(())
    } else {
        Err(StorageError::ParentNotWritable(parent.to_string()))
    }
}
