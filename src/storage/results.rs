//! Storage result and option types
//!
//! Defines the values passed into and returned by storage operations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Classification of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Directory,
    File,
    Link,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Directory, ContentKind::File, ContentKind::Link];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Directory => "directory",
            ContentKind::File => "file",
            ContentKind::Link => "link",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" | "d" => Ok(ContentKind::Directory),
            "file" | "f" => Ok(ContentKind::File),
            "link" | "l" => Ok(ContentKind::Link),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// A node of a directory listing: either a leaf kind or a nested listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Kind(ContentKind),
    Tree(DirectoryContentTree),
}

impl ContentNode {
    /// Whether this node stands for a directory, listed recursively or not
    pub fn is_directory(&self) -> bool {
        matches!(
            self,
            ContentNode::Tree(_) | ContentNode::Kind(ContentKind::Directory)
        )
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentNode::Tree(_) => ContentKind::Directory,
            ContentNode::Kind(kind) => *kind,
        }
    }
}

/// Directory listing keyed by entry name or full path
pub type DirectoryContentTree = BTreeMap<String, ContentNode>;

/// Options for directory creation
#[derive(Debug, Clone, Copy)]
pub struct CreateOptions {
    /// Mode of the directory itself
    pub mode: u32,
    /// Mode of any parent directories created along the way
    pub parent_mode: u32,
    pub create_missing_parents: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            mode: 0o777,
            parent_mode: 0o777,
            create_missing_parents: true,
        }
    }
}

/// Options for directory listings
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub recursive: bool,
    /// Key entries by full path instead of bare name
    pub full_paths: bool,
    /// Leaf kinds to include; sub-trees of a recursive listing are always included
    pub included_kinds: Vec<ContentKind>,
}

impl ListOptions {
    pub fn includes(&self, kind: ContentKind) -> bool {
        self.included_kinds.contains(&kind)
    }

    /// Recursive listing keyed by bare names, as used for collision detection
    pub fn name_tree() -> Self {
        Self {
            recursive: true,
            full_paths: false,
            ..Self::default()
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            full_paths: true,
            included_kinds: ContentKind::ALL.to_vec(),
        }
    }
}

/// Options for copy and move operations
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    pub create_missing_parents: bool,
    /// Allow replacing existing destination content
    pub overwrite: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            create_missing_parents: true,
            overwrite: false,
        }
    }
}

/// Options for file writes
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub append: bool,
    pub create_missing_parents: bool,
}

/// Whether a transfer keeps or removes its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}
