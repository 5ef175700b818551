//! File operations
//!
//! Delete, copy, move, chmod, read and write single files. Symbolic links are
//! treated as entries in their own right: they are deleted, copied and moved as
//! links, never through to their targets, and reads, writes and mode changes
//! refuse them.

use log::{debug, info};
use std::fs::{self, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{PermissionsExt, symlink};

use crate::error::{FsAction, StorageError};
use crate::sandbox::normalize::parent_path;
use crate::storage::results::{
    ContentKind, CreateOptions, TransferMode, TransferOptions, WriteOptions,
};
use crate::storage::validation::{
    entry_exists, entry_kind, is_directory, is_special_file, require_file,
    require_parent_traversable, require_parent_writable, require_readable, require_writable,
};
use crate::storage::{Storage, op_error};

impl Storage {
    /// Deletes a file or link.
    ///
    /// Returns `false` if nothing existed at the path.
    pub fn delete_file_if_exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = self.check(path)?;

        match entry_kind(&path) {
            None => {
                debug!("File {} already absent", path);
                return Ok(false);
            }
            Some(ContentKind::Directory) => return Err(StorageError::NotAFile(path)),
            Some(_) => {}
        }

        let parent = parent_path(&path);
        require_parent_traversable(&parent)?;
        require_parent_writable(&parent)?;

        fs::remove_file(&path).map_err(|e| op_error(FsAction::DeleteFile, &path, e))?;

        info!("Deleted file {}", path);
        Ok(true)
    }

    /// Makes sure `parent` exists, creating it when allowed
    fn ensure_parent(&self, parent: &str, create_missing: bool) -> Result<(), StorageError> {
        if is_directory(parent) {
            return Ok(());
        }
        if !create_missing {
            return Err(StorageError::ParentMissing(parent.to_string()));
        }
        let options = CreateOptions {
            create_missing_parents: true,
            ..*self.create_options()
        };
        self.create_directory_if_missing(parent, &options)?;
        Ok(())
    }

    /// Reads, writes and mode changes act on regular files only. A link is refused
    /// rather than followed, so its target cannot escape the sandbox.
    fn require_regular_entry(path: &str) -> Result<(), StorageError> {
        match entry_kind(path) {
            Some(ContentKind::Link | ContentKind::Directory) => {
                Err(StorageError::NotAFile(path.to_string()))
            }
            Some(ContentKind::File) if is_special_file(path) => {
                Err(StorageError::NotAFile(path.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Validates a file copy or move.
    ///
    /// Returns the normalized paths, the source kind and whether the destination
    /// will be overwritten.
    fn check_file_preconditions(
        &self,
        mode: TransferMode,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<(String, String, ContentKind, bool), StorageError> {
        let old_path = self.check(old_path)?;
        let new_path = self.check(new_path)?;

        let old_parent = parent_path(&old_path);
        require_parent_writable(&old_parent)?;
        if mode == TransferMode::Move {
            require_parent_traversable(&old_parent)?;
        }

        let kind = match entry_kind(&old_path) {
            Some(ContentKind::Directory) | None => {
                return Err(StorageError::FileNotFound(old_path));
            }
            Some(kind) => kind,
        };
        // A link is recreated from its target path, its content is never read
        if kind == ContentKind::File {
            if is_special_file(&old_path) {
                return Err(StorageError::FileNotFound(old_path));
            }
            require_readable(&old_path)?;
        }

        if old_path == new_path {
            return Err(StorageError::SameLocation(old_path));
        }

        let new_parent = parent_path(&new_path);
        self.ensure_parent(&new_parent, options.create_missing_parents)?;
        require_parent_traversable(&new_parent)?;
        require_parent_writable(&new_parent)?;

        let overwrite = match entry_kind(&new_path) {
            None => false,
            Some(ContentKind::Directory) => return Err(StorageError::DestinationExists(new_path)),
            Some(_) if options.overwrite => true,
            Some(_) => return Err(StorageError::DestinationExists(new_path)),
        };

        Ok((old_path, new_path, kind, overwrite))
    }

    /// Copies one entry byte for byte, or recreates it when it is a link
    fn transfer_entry(
        &self,
        old_path: &str,
        new_path: &str,
        kind: ContentKind,
    ) -> Result<(), StorageError> {
        let replace = match entry_kind(new_path) {
            Some(ContentKind::Link) => true,
            Some(_) => kind == ContentKind::Link,
            None => false,
        };
        if replace {
            fs::remove_file(new_path).map_err(|e| op_error(FsAction::DeleteFile, new_path, e))?;
        }

        if kind == ContentKind::Link {
            let target =
                fs::read_link(old_path).map_err(|e| op_error(FsAction::ReadLink, old_path, e))?;
            symlink(&target, new_path).map_err(|e| op_error(FsAction::CreateLink, new_path, e))?;
        } else {
            fs::copy(old_path, new_path).map_err(|e| op_error(FsAction::CopyFile, old_path, e))?;
        }
        Ok(())
    }

    /// Copies a file.
    ///
    /// Returns `true` if an existing destination was overwritten.
    pub fn copy_file(
        &self,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<bool, StorageError> {
        let (old_path, new_path, kind, overwritten) =
            self.check_file_preconditions(TransferMode::Copy, old_path, new_path, options)?;

        self.transfer_entry(&old_path, &new_path, kind)?;

        info!("Copied file {} to {}", old_path, new_path);
        Ok(overwritten)
    }

    /// Moves a file: copy, then delete the source.
    ///
    /// Returns `true` if an existing destination was overwritten.
    pub fn move_file(
        &self,
        old_path: &str,
        new_path: &str,
        options: &TransferOptions,
    ) -> Result<bool, StorageError> {
        let (old_path, new_path, kind, overwritten) =
            self.check_file_preconditions(TransferMode::Move, old_path, new_path, options)?;

        self.transfer_entry(&old_path, &new_path, kind)?;
        self.delete_file_if_exists(&old_path)?;

        info!("Moved file {} to {}", old_path, new_path);
        Ok(overwritten)
    }

    /// Changes the permission bits of a file
    pub fn chmod_file(&self, path: &str, mode: u32) -> Result<(), StorageError> {
        let path = self.check(path)?;

        require_parent_traversable(&parent_path(&path))?;
        Self::require_regular_entry(&path)?;
        require_file(&path)?;
        if !self.has_owner_rights(&path)? {
            return Err(StorageError::NotOwner(path));
        }

        fs::set_permissions(&path, Permissions::from_mode(mode))
            .map_err(|e| op_error(FsAction::Chmod, &path, e))?;

        info!("Changed mode of file {} to {:04o}", path, mode);
        Ok(())
    }

    /// Reads the whole content of a file
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.check(path)?;

        require_parent_traversable(&parent_path(&path))?;
        Self::require_regular_entry(&path)?;
        require_file(&path)?;
        require_readable(&path)?;

        let content = fs::read(&path).map_err(|e| op_error(FsAction::ReadFile, &path, e))?;

        debug!("Read {} bytes from {}", content.len(), path);
        Ok(content)
    }

    /// Writes or appends `data` to a file, creating it when missing.
    ///
    /// Returns the number of bytes written.
    pub fn write_file(
        &self,
        path: &str,
        data: &[u8],
        options: &WriteOptions,
    ) -> Result<usize, StorageError> {
        let path = self.check(path)?;

        let parent = parent_path(&path);
        self.ensure_parent(&parent, options.create_missing_parents)?;
        require_parent_traversable(&parent)?;

        if entry_exists(&path) {
            Self::require_regular_entry(&path)?;
            require_writable(&path)?;
        } else {
            require_parent_writable(&parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(options.append)
            .truncate(!options.append)
            .open(&path)
            .map_err(|e| op_error(FsAction::WriteFile, &path, e))?;
        file.write_all(data)
            .map_err(|e| op_error(FsAction::WriteFile, &path, e))?;

        info!(
            "{} {} bytes to {}",
            if options.append { "Appended" } else { "Wrote" },
            data.len(),
            path
        );
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::Sandbox;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, String, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let sandbox = Sandbox::new([root.as_str()]).unwrap();
        (dir, root, Storage::new(Arc::new(sandbox)))
    }

    #[test]
    fn test_write_then_read() {
        let (_dir, root, storage) = setup();
        let path = format!("{}/notes.txt", root);

        let written = storage
            .write_file(&path, b"hello", &WriteOptions::default())
            .unwrap();
        assert_eq!(written, 5);

        let append = WriteOptions {
            append: true,
            ..WriteOptions::default()
        };
        storage.write_file(&path, b" world", &append).unwrap();
        assert_eq!(storage.read_file(&path).unwrap(), b"hello world");

        storage
            .write_file(&path, b"reset", &WriteOptions::default())
            .unwrap();
        assert_eq!(storage.read_file(&path).unwrap(), b"reset");
    }

    #[test]
    fn test_write_requires_parent_unless_asked() {
        let (_dir, root, storage) = setup();
        let path = format!("{}/album/a.jpg", root);

        assert!(matches!(
            storage.write_file(&path, b"x", &WriteOptions::default()),
            Err(StorageError::ParentMissing(_))
        ));

        let options = WriteOptions {
            create_missing_parents: true,
            ..WriteOptions::default()
        };
        storage.write_file(&path, b"x", &options).unwrap();
        assert!(is_directory(&format!("{}/album", root)));
    }

    #[test]
    fn test_write_onto_directory_fails() {
        let (_dir, root, storage) = setup();
        assert!(matches!(
            storage.write_file(&root, b"x", &WriteOptions::default()),
            Err(StorageError::NotAFile(_))
        ));
    }

    #[test]
    fn test_delete_file_twice() {
        let (_dir, root, storage) = setup();
        let path = format!("{}/a.txt", root);
        fs::write(&path, b"a").unwrap();

        assert!(storage.delete_file_if_exists(&path).unwrap());
        assert!(!storage.delete_file_if_exists(&path).unwrap());
    }

    #[test]
    fn test_delete_file_refuses_directory() {
        let (_dir, root, storage) = setup();
        let sub = format!("{}/sub", root);
        fs::create_dir(&sub).unwrap();

        assert!(matches!(
            storage.delete_file_if_exists(&sub),
            Err(StorageError::NotAFile(_))
        ));
    }

    #[test]
    fn test_delete_link_keeps_target() {
        let (_dir, root, storage) = setup();
        let target = format!("{}/target.txt", root);
        let link = format!("{}/link.txt", root);
        fs::write(&target, b"t").unwrap();
        symlink(&target, &link).unwrap();

        assert!(storage.delete_file_if_exists(&link).unwrap());
        assert!(entry_exists(&target));
        assert!(!entry_exists(&link));
    }

    #[test]
    fn test_copy_file() {
        let (_dir, root, storage) = setup();
        let a = format!("{}/a.txt", root);
        let b = format!("{}/copies/b.txt", root);
        fs::write(&a, b"payload").unwrap();

        let overwritten = storage
            .copy_file(&a, &b, &TransferOptions::default())
            .unwrap();
        assert!(!overwritten);
        assert_eq!(storage.read_file(&b).unwrap(), storage.read_file(&a).unwrap());
    }

    #[test]
    fn test_copy_file_needs_overwrite() {
        let (_dir, root, storage) = setup();
        let a = format!("{}/a.txt", root);
        let b = format!("{}/b.txt", root);
        fs::write(&a, b"new").unwrap();
        fs::write(&b, b"old").unwrap();

        assert!(matches!(
            storage.copy_file(&a, &b, &TransferOptions::default()),
            Err(StorageError::DestinationExists(_))
        ));

        let options = TransferOptions {
            overwrite: true,
            ..TransferOptions::default()
        };
        assert!(storage.copy_file(&a, &b, &options).unwrap());
        assert_eq!(fs::read(&b).unwrap(), b"new");
    }

    #[test]
    fn test_copy_file_rejections() {
        let (_dir, root, storage) = setup();
        let a = format!("{}/a.txt", root);
        let sub = format!("{}/sub", root);
        fs::write(&a, b"a").unwrap();
        fs::create_dir(&sub).unwrap();

        let options = TransferOptions {
            overwrite: true,
            ..TransferOptions::default()
        };
        assert!(matches!(
            storage.copy_file(&a, &a, &options),
            Err(StorageError::SameLocation(_))
        ));
        assert!(matches!(
            storage.copy_file(&a, &sub, &options),
            Err(StorageError::DestinationExists(_))
        ));
        assert!(matches!(
            storage.copy_file(&sub, &format!("{}/b", root), &options),
            Err(StorageError::FileNotFound(_))
        ));

        let no_parents = TransferOptions {
            create_missing_parents: false,
            overwrite: false,
        };
        assert!(matches!(
            storage.copy_file(&a, &format!("{}/missing/b.txt", root), &no_parents),
            Err(StorageError::ParentMissing(_))
        ));
    }

    #[test]
    fn test_copy_link_recreates_link() {
        let (_dir, root, storage) = setup();
        let target = format!("{}/target.txt", root);
        let link = format!("{}/link.txt", root);
        let copy = format!("{}/copy.txt", root);
        fs::write(&target, b"t").unwrap();
        symlink("target.txt", &link).unwrap();

        storage
            .copy_file(&link, &copy, &TransferOptions::default())
            .unwrap();
        assert_eq!(entry_kind(&copy), Some(ContentKind::Link));
        assert_eq!(fs::read_link(&copy).unwrap().to_string_lossy(), "target.txt");
    }

    #[test]
    fn test_overwrite_replaces_destination_link() {
        let (_dir, root, storage) = setup();
        let target = format!("{}/target.txt", root);
        let link = format!("{}/link.txt", root);
        let source = format!("{}/source.txt", root);
        fs::write(&target, b"untouched").unwrap();
        fs::write(&source, b"fresh").unwrap();
        symlink(&target, &link).unwrap();

        let options = TransferOptions {
            overwrite: true,
            ..TransferOptions::default()
        };
        storage.copy_file(&source, &link, &options).unwrap();

        assert_eq!(entry_kind(&link), Some(ContentKind::File));
        assert_eq!(fs::read(&target).unwrap(), b"untouched");
        assert_eq!(fs::read(&link).unwrap(), b"fresh");
    }

    #[test]
    fn test_move_file() {
        let (_dir, root, storage) = setup();
        let a = format!("{}/a.txt", root);
        let b = format!("{}/moved/b.txt", root);
        fs::write(&a, b"payload").unwrap();

        storage
            .move_file(&a, &b, &TransferOptions::default())
            .unwrap();
        assert!(!entry_exists(&a));
        assert_eq!(fs::read(&b).unwrap(), b"payload");
    }

    #[test]
    fn test_chmod_file() {
        let (_dir, root, storage) = setup();
        let a = format!("{}/a.txt", root);
        fs::write(&a, b"a").unwrap();

        storage.chmod_file(&a, 0o640).unwrap();
        assert_eq!(storage.path_mode(&a, true).unwrap(), "0640");
    }

    #[test]
    fn test_outside_sandbox_is_rejected() {
        let (_dir, _root, storage) = setup();
        assert!(matches!(
            storage.read_file("/etc/passwd"),
            Err(StorageError::Sandbox(_))
        ));
        assert!(matches!(
            storage.write_file("/etc/passwd", b"x", &WriteOptions::default()),
            Err(StorageError::Sandbox(_))
        ));
    }

    #[test]
    fn test_link_to_outside_file_is_never_followed() {
        let (_dir, root, storage) = setup();
        let outside = tempfile::tempdir().unwrap();
        let victim = outside.path().join("victim.txt");
        fs::write(&victim, b"original").unwrap();
        let link = format!("{}/link", root);
        symlink(&victim, &link).unwrap();

        assert!(matches!(
            storage.write_file(&link, b"changed", &WriteOptions::default()),
            Err(StorageError::NotAFile(_))
        ));
        assert!(matches!(
            storage.read_file(&link),
            Err(StorageError::NotAFile(_))
        ));
        assert!(matches!(
            storage.chmod_file(&link, 0o777),
            Err(StorageError::NotAFile(_))
        ));
        assert_eq!(fs::read(&victim).unwrap(), b"original");
    }

    #[test]
    fn test_fifo_is_not_copied_or_written() {
        let (_dir, root, storage) = setup();
        let fifo = format!("{}/pipe", root);
        nix::unistd::mkfifo(fifo.as_str(), nix::sys::stat::Mode::S_IRWXU).unwrap();

        assert!(matches!(
            storage.copy_file(&fifo, &format!("{}/copy", root), &TransferOptions::default()),
            Err(StorageError::FileNotFound(_))
        ));
        assert!(matches!(
            storage.write_file(&fifo, b"x", &WriteOptions::default()),
            Err(StorageError::NotAFile(_))
        ));
        assert!(storage.delete_file_if_exists(&fifo).unwrap());
    }

    #[test]
    fn test_implicit_directories_use_configured_modes() {
        let (_dir, root, storage) = setup();
        let storage = storage.with_create_options(CreateOptions {
            mode: 0o750,
            parent_mode: 0o700,
            create_missing_parents: true,
        });

        let options = WriteOptions {
            create_missing_parents: true,
            ..WriteOptions::default()
        };
        storage
            .write_file(&format!("{}/a/b/file.txt", root), b"x", &options)
            .unwrap();
        assert_eq!(storage.path_mode(&format!("{}/a", root), true).unwrap(), "0700");
        assert_eq!(storage.path_mode(&format!("{}/a/b", root), true).unwrap(), "0750");

        storage
            .copy_file(
                &format!("{}/a/b/file.txt", root),
                &format!("{}/c/file.txt", root),
                &TransferOptions::default(),
            )
            .unwrap();
        assert_eq!(storage.path_mode(&format!("{}/c", root), true).unwrap(), "0750");
    }
}
