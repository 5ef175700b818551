//! File system storage management
//!
//! Handles directory and file operations, permissions, and precondition checks.
//! Every operation is confined to the sandbox the [`Storage`] was built with.

pub mod collision;
pub mod directory;
pub mod file;
pub mod permissions;
pub mod results;
pub mod validation;

use std::sync::Arc;

use log::error;

use crate::error::{FsAction, StorageError};
use crate::sandbox::Sandbox;

const CURRENT_DIRECTORY: &str = ".";

pub use results::{
    ContentKind, ContentNode, CreateOptions, DirectoryContentTree, ListOptions, TransferMode,
    TransferOptions, WriteOptions,
};

/// Entry point for all sandboxed filesystem operations
#[derive(Debug, Clone)]
pub struct Storage {
    sandbox: Arc<Sandbox>,
    /// Modes for directories created implicitly by copy, move and write
    create_options: CreateOptions,
}

impl Storage {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self {
            sandbox,
            create_options: CreateOptions::default(),
        }
    }

    /// Use these modes whenever an operation has to create directories on its own
    pub fn with_create_options(mut self, create_options: CreateOptions) -> Self {
        self.create_options = create_options;
        self
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn create_options(&self) -> &CreateOptions {
        &self.create_options
    }

    /// Normalize and confine a path argument. A path that normalizes to nothing
    /// is the current directory.
    pub(crate) fn check(&self, path: &str) -> Result<String, StorageError> {
        let path = self.sandbox.check(path)?;
        if path.is_empty() {
            return Ok(CURRENT_DIRECTORY.to_string());
        }
        Ok(path)
    }
}

/// Wrap a failed OS call, logging it with the path involved
pub(crate) fn op_error(action: FsAction, path: &str, source: std::io::Error) -> StorageError {
    error!("Failed to {} {}: {}", action, path, source);
    StorageError::operation(action, path, source)
}
