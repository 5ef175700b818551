//! Info inspection
//!
//! Read-only queries: disk space, process identity, path ownership and permission bits.

pub mod disk;
pub mod identity;
mod inspect;
pub mod mode;
pub mod results;

pub use disk::DEFAULT_DISK_SPACE_PATH;
pub use identity::{ROOT_ID, process_group, process_owner};
pub use mode::{mode_to_octal, mode_to_symbolic};
pub use results::{DiskSpace, GroupInfo, OwnerInfo, PermissionInfo};
