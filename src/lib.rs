pub mod commands;
pub mod config;
pub mod error;
pub mod info;
pub mod sandbox;
pub mod storage;
pub mod utils;

pub use config::FsConfig;
pub use error::{FsError, StorageError};
pub use sandbox::{Sandbox, normalize_path};
pub use storage::Storage;
