//! Directory operations
//!
//! Create, inspect, list, delete, copy, move and chmod directories. Bulk operations
//! recurse through the single-entry operations and stop at the first error, leaving
//! whatever was already done in place.

use log::{debug, info, warn};
use std::fs::{self, DirBuilder, Permissions};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

use crate::error::{FsAction, StorageError};
use crate::sandbox::normalize::{is_root, is_within, join_path, parent_path};
use crate::storage::collision::find_collision;
use crate::storage::results::{
    ContentKind, ContentNode, CreateOptions, DirectoryContentTree, ListOptions, TransferMode,
    TransferOptions,
};
use crate::storage::validation::{
    entry_exists, entry_kind, is_directory, is_special_file, kind_from_file_type,
    require_directory, require_parent_traversable, require_parent_writable, require_readable,
    require_traversable, require_writable,
};
use crate::storage::{Storage, op_error};

impl Storage {
    /// Creates a directory unless it already exists.
    ///
    /// Returns `true` if the directory was created, `false` if it was already there.
    pub fn create_directory_if_missing(
        &self,
        path: &str,
        options: &CreateOptions,
    ) -> Result<bool, StorageError> {
        let path = self.check(path)?;

        if is_directory(&path) {
            debug!("Directory {} already exists", path);
            return Ok(false);
        }
        if entry_exists(&path) {
            return Err(StorageError::NotADirectory(path));
        }

        let parent = parent_path(&path);
        if !is_directory(&parent) {
            if !options.create_missing_parents || parent == path {
                return Err(StorageError::ParentMissing(parent));
            }
            let parent_options = CreateOptions {
                mode: options.parent_mode,
                ..*options
            };
            self.create_directory_if_missing(&parent, &parent_options)?;
        }
        require_parent_traversable(&parent)?;
        require_parent_writable(&parent)?;

        DirBuilder::new()
            .mode(options.mode)
            .create(&path)
            .map_err(|e| op_error(FsAction::CreateDirectory, &path, e))?;

        info!("Created directory {} (mode {:04o})", path, options.mode);
        Ok(true)
    }

    /// Checks whether a directory has no entries
    pub fn is_directory_empty(&self, path: &str) -> Result<bool, StorageError> {
        let path = self.check(path)?;

        require_directory(&path)?;
        require_readable(&path)?;

        let mut entries =
            fs::read_dir(&path).map_err(|e| op_error(FsAction::ReadDirectory, &path, e))?;

        match entries.next() {
            None => Ok(true),
            Some(Ok(_)) => Ok(false),
            Some(Err(e)) => Err(op_error(FsAction::ReadDirectory, &path, e)),
        }
    }

    /// Lists the content of a directory, optionally descending into sub-directories.
    ///
    /// Entries are classified without following links, so a recursive listing never
    /// leaves the tree through a symlink. In a recursive listing every sub-directory
    /// appears as a sub-tree; `included_kinds` filters the leaves.
    pub fn list_directory_content(
        &self,
        path: &str,
        options: &ListOptions,
    ) -> Result<DirectoryContentTree, StorageError> {
        let path = self.check(path)?;

        require_directory(&path)?;
        require_readable(&path)?;

        let entries =
            fs::read_dir(&path).map_err(|e| op_error(FsAction::ReadDirectory, &path, e))?;

        let mut content = DirectoryContentTree::new();
        for entry in entries {
            let entry = entry.map_err(|e| op_error(FsAction::ReadDirectory, &path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| op_error(FsAction::Metadata, &path, e))?;

            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = join_path(&path, &name);
            let kind = kind_from_file_type(file_type);
            let key = if options.full_paths {
                entry_path.clone()
            } else {
                name
            };

            if kind == ContentKind::Directory && options.recursive {
                let sub_tree = self.list_directory_content(&entry_path, options)?;
                content.insert(key, ContentNode::Tree(sub_tree));
            } else if options.includes(kind) {
                content.insert(key, ContentNode::Kind(kind));
            }
        }

        debug!("Listed directory {} - {} entries", path, content.len());
        Ok(content)
    }

    /// Deletes everything inside a directory.
    ///
    /// Returns `false` if the directory was already empty.
    pub fn delete_directory_content_if_exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = self.check(path)?;

        require_directory(&path)?;
        if self.is_directory_empty(&path)? {
            debug!("Directory {} is already empty", path);
            return Ok(false);
        }
        require_writable(&path)?;
        require_readable(&path)?;

        let content = self.list_directory_content(&path, &ListOptions::default())?;
        for (entry_path, node) in content {
            if node.kind() == ContentKind::Directory {
                self.delete_directory_if_exists(&entry_path, true)?;
            } else {
                self.delete_file_if_exists(&entry_path)?;
            }
        }

        info!("Deleted content of directory {}", path);
        Ok(true)
    }

    /// Deletes a directory, and with `delete_with_content` everything inside it.
    ///
    /// Returns `false` if there was no directory to delete.
    pub fn delete_directory_if_exists(
        &self,
        path: &str,
        delete_with_content: bool,
    ) -> Result<bool, StorageError> {
        let path = self.check(path)?;

        if is_root(&path) {
            return Err(StorageError::RootDeletion);
        }

        match entry_kind(&path) {
            None => {
                debug!("Directory {} already absent", path);
                return Ok(false);
            }
            Some(ContentKind::Directory) => {}
            Some(_) => return Err(StorageError::NotADirectory(path)),
        }

        let parent = parent_path(&path);
        require_parent_traversable(&parent)?;

        if !self.is_directory_empty(&path)? {
            if delete_with_content {
                self.delete_directory_content_if_exists(&path)?;
            } else {
                return Err(StorageError::DirectoryNotEmpty(path));
            }
        }

        require_parent_writable(&parent)?;

        fs::remove_dir(&path).map_err(|e| op_error(FsAction::DeleteDirectory, &path, e))?;

        info!("Deleted directory {}", path);
        Ok(true)
    }

    /// Validates a directory copy or move and reports whether content will be overwritten.
    ///
    /// A missing destination is created here, so there is nothing to collide with.
    fn check_directory_preconditions(
        &self,
        mode: TransferMode,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<(String, String, bool), StorageError> {
        let old_path = self.check(old_path)?;
        let new_path = self.check(new_path)?;

        require_directory(&old_path)?;
        require_readable(&old_path)?;
        if mode == TransferMode::Move {
            let old_parent = parent_path(&old_path);
            require_parent_traversable(&old_parent)?;
            require_parent_writable(&old_parent)?;
        }

        if is_within(&new_path, &old_path) {
            return Err(StorageError::DestinationInsideSource {
                source_path: old_path,
                destination: new_path,
            });
        }

        if !entry_exists(&new_path) {
            let new_parent = parent_path(&new_path);
            if !is_directory(&new_parent) && !options.create_missing_parents {
                return Err(StorageError::ParentMissing(new_parent));
            }
            let create_options = CreateOptions {
                create_missing_parents: options.create_missing_parents,
                ..*self.create_options()
            };
            self.create_directory_if_missing(&new_path, &create_options)?;
            return Ok((old_path, new_path, false));
        }

        if !is_directory(&new_path) {
            return Err(StorageError::NotADirectory(new_path));
        }
        require_traversable(&new_path)?;
        require_writable(&new_path)?;

        let old_tree = self.list_directory_content(&old_path, &ListOptions::name_tree())?;
        let new_tree = self.list_directory_content(&new_path, &ListOptions::name_tree())?;

        match find_collision(&old_tree, &new_tree) {
            None => Ok((old_path, new_path, false)),
            Some(entry) if options.overwrite => {
                info!(
                    "Destination {} collides at {}; content will be overwritten",
                    new_path, entry
                );
                Ok((old_path, new_path, true))
            }
            Some(entry) => Err(StorageError::DestinationCollision {
                destination: new_path,
                entry,
            }),
        }
    }

    /// Copies the entries of one directory into another, replacing entries of the
    /// wrong kind on the destination side. Fifos, sockets and devices are skipped.
    fn copy_directory_content(&self, old_path: &str, new_path: &str) -> Result<(), StorageError> {
        let names = ListOptions {
            full_paths: false,
            ..ListOptions::default()
        };
        let content = self.list_directory_content(old_path, &names)?;

        for (name, node) in content {
            let old_entry = join_path(old_path, &name);
            let new_entry = join_path(new_path, &name);

            if node.kind() == ContentKind::Directory {
                match entry_kind(&new_entry) {
                    Some(ContentKind::Directory) => {}
                    Some(_) => {
                        self.delete_file_if_exists(&new_entry)?;
                        self.create_directory_if_missing(&new_entry, self.create_options())?;
                    }
                    None => {
                        self.create_directory_if_missing(&new_entry, self.create_options())?;
                    }
                }
                self.copy_directory_content(&old_entry, &new_entry)?;
            } else if is_special_file(&old_entry) {
                warn!("Skipping special file {}", old_entry);
            } else {
                if entry_kind(&new_entry) == Some(ContentKind::Directory) {
                    self.delete_directory_if_exists(&new_entry, true)?;
                }
                let leaf = TransferOptions {
                    create_missing_parents: false,
                    overwrite: true,
                };
                self.copy_file(&old_entry, &new_entry, &leaf)?;
            }
        }

        Ok(())
    }

    /// Copies a directory with all its content.
    ///
    /// Returns `true` if existing content was overwritten.
    pub fn copy_directory(
        &self,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<bool, StorageError> {
        let (old_path, new_path, overwritten) =
            self.check_directory_preconditions(TransferMode::Copy, old_path, new_path, options)?;

        self.copy_directory_content(&old_path, &new_path)?;

        info!("Copied directory {} to {}", old_path, new_path);
        Ok(overwritten)
    }

    /// Moves a directory with all its content: copy, then delete the source.
    ///
    /// Returns `true` if existing content was overwritten.
    pub fn move_directory(
        &self,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<bool, StorageError> {
        let (old_path, new_path, overwritten) =
            self.check_directory_preconditions(TransferMode::Move, old_path, new_path, options)?;

        self.copy_directory_content(&old_path, &new_path)?;
        self.delete_directory_if_exists(&old_path, true)?;

        info!("Moved directory {} to {}", old_path, new_path);
        Ok(overwritten)
    }

    /// Changes the mode of a directory, and with `recursive` of its sub-directories
    /// (and files too unless `only_directories`). Links are left alone.
    ///
    /// Children are handled before the directory itself so a restrictive mode
    /// cannot lock the walk out halfway.
    pub fn chmod_directory(
        &self,
        path: &str,
        mode: u32,
        recursive: bool,
        only_directories: bool,
    ) -> Result<(), StorageError> {
        let path = self.check(path)?;

        require_directory(&path)?;
        if !self.has_owner_rights(&path)? {
            return Err(StorageError::NotOwner(path));
        }

        if recursive {
            let content = self.list_directory_content(&path, &ListOptions::default())?;
            for (entry_path, node) in content {
                match node.kind() {
                    ContentKind::Directory => {
                        self.chmod_directory(&entry_path, mode, recursive, only_directories)?
                    }
                    ContentKind::File if !only_directories && !is_special_file(&entry_path) => {
                        self.chmod_file(&entry_path, mode)?
                    }
                    _ => {}
                }
            }
        }

        fs::set_permissions(&path, Permissions::from_mode(mode))
            .map_err(|e| op_error(FsAction::Chmod, &path, e))?;

        info!("Changed mode of directory {} to {:04o}", path, mode);
        Ok(())
    }
}
