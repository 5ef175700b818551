//! Info result types

use std::fmt;
use std::path::PathBuf;

use crate::utils::format::human_readable_bytes;

/// Total, free and used space of a filesystem in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpace {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

impl DiskSpace {
    pub fn new(total: u64, free: u64) -> Self {
        Self {
            total,
            free,
            used: total.saturating_sub(free),
        }
    }
}

impl fmt::Display for DiskSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {}, free {}, used {}",
            human_readable_bytes(self.total, false),
            human_readable_bytes(self.free, false),
            human_readable_bytes(self.used, false)
        )
    }
}

/// A user account from the OS identity database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerInfo {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    pub shell: PathBuf,
}

/// A group from the OS identity database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: String,
    pub gid: u32,
    pub members: Vec<String>,
}

/// Owner, group and mode of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionInfo {
    pub owner: String,
    pub group: String,
    /// Symbolic form, e.g. `drwxrwxr-x`
    pub mode: String,
    /// Octal form, e.g. `0775`
    pub mode_octal: String,
}

impl fmt::Display for PermissionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}:{}",
            self.mode, self.mode_octal, self.owner, self.group
        )
    }
}
