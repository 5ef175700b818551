//! Content tree collisions
//!
//! Two name trees collide where the same relative name exists on both sides and
//! at least one of the two is not a directory. Same-named directories are compared
//! by their contents instead.

use crate::sandbox::normalize::join_path;
use crate::storage::results::{ContentNode, DirectoryContentTree};

/// Relative path of the first collision between two name trees, if any
pub fn find_collision(
    first: &DirectoryContentTree,
    second: &DirectoryContentTree,
) -> Option<String> {
    for (name, node) in first {
        let Some(other) = second.get(name) else {
            continue;
        };

        match (node, other) {
            (ContentNode::Tree(sub_first), ContentNode::Tree(sub_second)) => {
                if let Some(nested) = find_collision(sub_first, sub_second) {
                    return Some(join_path(name, &nested));
                }
            }
            _ if node.is_directory() && other.is_directory() => continue,
            _ => return Some(name.clone()),
        }
    }
    None
}
