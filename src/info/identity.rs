//! Process and path identity
//!
//! Looks up users and groups in the OS identity database.

use nix::unistd::{Gid, Group, Uid, User, getegid, geteuid};

use crate::error::{FsAction, StorageError};
use crate::info::results::{GroupInfo, OwnerInfo};

/// Numeric id of the superuser
pub const ROOT_ID: u32 = 0;

impl From<User> for OwnerInfo {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
            home: user.dir,
            shell: user.shell,
        }
    }
}

impl From<Group> for GroupInfo {
    fn from(group: Group) -> Self {
        Self {
            name: group.name,
            gid: group.gid.as_raw(),
            members: group.mem,
        }
    }
}

/// Effective user id of the running process
pub fn process_uid() -> u32 {
    geteuid().as_raw()
}

/// Effective group id of the running process
pub fn process_gid() -> u32 {
    getegid().as_raw()
}

/// Look up a user by id. `subject` names what the id belongs to, for errors.
pub fn lookup_user(uid: u32, subject: &str) -> Result<OwnerInfo, StorageError> {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => Ok(user.into()),
        Ok(None) => Err(StorageError::OwnerLookupFailed(format!(
            "{} (uid {})",
            subject, uid
        ))),
        Err(errno) => Err(StorageError::operation(
            FsAction::IdentityLookup,
            subject,
            errno.into(),
        )),
    }
}

/// Look up a group by id. `subject` names what the id belongs to, for errors.
pub fn lookup_group(gid: u32, subject: &str) -> Result<GroupInfo, StorageError> {
    match Group::from_gid(Gid::from_raw(gid)) {
        Ok(Some(group)) => Ok(group.into()),
        Ok(None) => Err(StorageError::GroupLookupFailed(format!(
            "{} (gid {})",
            subject, gid
        ))),
        Err(errno) => Err(StorageError::operation(
            FsAction::IdentityLookup,
            subject,
            errno.into(),
        )),
    }
}

/// Info about the user the process runs as
pub fn process_owner() -> Result<OwnerInfo, StorageError> {
    lookup_user(process_uid(), "process")
}

/// Info about the group the process runs as
pub fn process_group() -> Result<GroupInfo, StorageError> {
    lookup_group(process_gid(), "process")
}

/// Whether the process may act as owner of something owned by `owner_uid`
pub fn is_owner_or_root(owner_uid: u32) -> bool {
    let uid = process_uid();
    uid == ROOT_ID || uid == owner_uid
}
