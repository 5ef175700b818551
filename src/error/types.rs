//! Error types
//!
//! Defines domain-specific error types for each layer of the filesystem utilities.

use std::fmt;
use std::io;

use thiserror::Error;

/// Configuration errors raised while building the sandbox or loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Allowed directory does not exist: {0}")]
    DirectoryNotFound(String),
    #[error("No allowed directories configured")]
    EmptyRootSet,
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Sandbox guard errors
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Path is not in an allowed directory: {0}")]
    NotInSandbox(String),
}

/// The OS call that failed after all preconditions passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAction {
    CreateDirectory,
    ReadDirectory,
    DeleteDirectory,
    DeleteFile,
    CopyFile,
    CreateLink,
    ReadLink,
    ReadFile,
    WriteFile,
    Chmod,
    Metadata,
    DiskSpace,
    IdentityLookup,
}

impl fmt::Display for FsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            FsAction::CreateDirectory => "create directory",
            FsAction::ReadDirectory => "read directory",
            FsAction::DeleteDirectory => "delete directory",
            FsAction::DeleteFile => "delete file",
            FsAction::CopyFile => "copy file",
            FsAction::CreateLink => "create link",
            FsAction::ReadLink => "read link",
            FsAction::ReadFile => "read file",
            FsAction::WriteFile => "write file",
            FsAction::Chmod => "change mode",
            FsAction::Metadata => "read metadata",
            FsAction::DiskSpace => "query disk space",
            FsAction::IdentityLookup => "look up identity",
        };
        f.write_str(action)
    }
}

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("Path does not exist: {0}")]
    PathNotFound(String),
    #[error("File does not exist: {0}")]
    FileNotFound(String),
    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("Parent directory does not exist: {0}")]
    ParentMissing(String),
    #[error("Parent directory is not executable: {0}")]
    ParentNotTraversable(String),
    #[error("Parent directory is not writable: {0}")]
    ParentNotWritable(String),
    #[error("Path is not readable: {0}")]
    NotReadable(String),
    #[error("Path is not writable: {0}")]
    NotWritable(String),
    #[error("Directory is not executable: {0}")]
    NotTraversable(String),
    #[error("Destination already exists: {0}")]
    DestinationExists(String),
    #[error("Directory is not empty: {0}")]
    DirectoryNotEmpty(String),
    #[error("Directory \"root\" cannot be deleted")]
    RootDeletion,
    #[error("Process is not the owner of: {0}")]
    NotOwner(String),
    #[error("Destination {destination} has collisions at: {entry}")]
    DestinationCollision { destination: String, entry: String },
    #[error("Destination {destination} lies inside source {source_path}")]
    DestinationInsideSource {
        source_path: String,
        destination: String,
    },
    #[error("Source and destination are the same: {0}")]
    SameLocation(String),
    #[error("Owner cannot be determined: {0}")]
    OwnerLookupFailed(String),
    #[error("Group cannot be determined: {0}")]
    GroupLookupFailed(String),

    #[error("Failed to {action} {path}: {source}")]
    Operation {
        action: FsAction,
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Builds an operation error for a failed OS call
    pub fn operation(action: FsAction, path: impl Into<String>, source: io::Error) -> Self {
        StorageError::Operation {
            action,
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sandbox(_) => "FS_NOT_IN_SANDBOX",
            Self::PathNotFound(_) => "FS_PATH_NOT_FOUND",
            Self::FileNotFound(_) => "FS_FILE_NOT_FOUND",
            Self::DirectoryNotFound(_) => "FS_DIRECTORY_NOT_FOUND",
            Self::NotAFile(_) => "FS_NOT_A_FILE",
            Self::NotADirectory(_) => "FS_NOT_A_DIRECTORY",
            Self::ParentMissing(_) => "FS_PARENT_MISSING",
            Self::ParentNotTraversable(_) => "FS_PARENT_NOT_TRAVERSABLE",
            Self::ParentNotWritable(_) => "FS_PARENT_NOT_WRITABLE",
            Self::NotReadable(_) => "FS_NOT_READABLE",
            Self::NotWritable(_) => "FS_NOT_WRITABLE",
            Self::NotTraversable(_) => "FS_NOT_TRAVERSABLE",
            Self::DestinationExists(_) => "FS_DESTINATION_EXISTS",
            Self::DirectoryNotEmpty(_) => "FS_DIRECTORY_NOT_EMPTY",
            Self::RootDeletion => "FS_ROOT_DELETION",
            Self::NotOwner(_) => "FS_NOT_OWNER",
            Self::DestinationCollision { .. } => "FS_DESTINATION_COLLISION",
            Self::DestinationInsideSource { .. } => "FS_DESTINATION_INSIDE_SOURCE",
            Self::SameLocation(_) => "FS_SAME_LOCATION",
            Self::OwnerLookupFailed(_) => "FS_OWNER_LOOKUP_FAILED",
            Self::GroupLookupFailed(_) => "FS_GROUP_LOOKUP_FAILED",
            Self::Operation { .. } => "FS_OPERATION_FAILED",
        }
    }

    /// Whether the error is a failed OS call rather than a violated precondition
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, Self::Operation { .. })
    }
}

/// General error that encompasses all error types
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<SandboxError> for FsError {
    fn from(error: SandboxError) -> Self {
        FsError::Storage(StorageError::Sandbox(error))
    }
}
