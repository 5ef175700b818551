//! Sandbox guard
//!
//! Holds the set of allowed root directories and checks every incoming path against it.

use log::{debug, warn};
use std::path::Path;

use crate::error::{ConfigError, SandboxError};
use crate::sandbox::normalize::{is_within, normalize_path};

/// The allowed root directories for all filesystem operations.
///
/// Built once at startup and shared read-only afterwards. A restricted sandbox always
/// has at least one root; the unrestricted variant has to be asked for explicitly.
#[derive(Debug, Clone)]
pub struct Sandbox {
    roots: Vec<String>,
    restricted: bool,
}

impl Sandbox {
    /// Restrict all operations to the given directories.
    ///
    /// Every root is normalized and must exist as a directory at this point.
    pub fn new<I, S>(roots: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for root in roots {
            let root = normalize_path(root.as_ref());
            if !Path::new(&root).is_dir() {
                return Err(ConfigError::DirectoryNotFound(root));
            }
            if !normalized.contains(&root) {
                normalized.push(root);
            }
        }

        if normalized.is_empty() {
            return Err(ConfigError::EmptyRootSet);
        }

        debug!("Sandbox restricted to {:?}", normalized);

        Ok(Self {
            roots: normalized,
            restricted: true,
        })
    }

    /// A sandbox that lets every path through (after normalization)
    pub fn unrestricted() -> Self {
        warn!("Sandbox is unrestricted: paths are normalized but not confined");
        Self {
            roots: Vec::new(),
            restricted: false,
        }
    }

    /// The normalized allowed roots
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Normalize a path and verify it lies under one of the allowed roots.
    ///
    /// Returns the normalized path on success.
    pub fn check(&self, path: &str) -> Result<String, SandboxError> {
        let normalized = normalize_path(path);

        if !self.restricted {
            return Ok(normalized);
        }

        if self.roots.iter().any(|root| is_within(&normalized, root)) {
            Ok(normalized)
        } else {
            warn!("Rejected path outside sandbox: {} (normalized: {})", path, normalized);
            Err(SandboxError::NotInSandbox(normalized))
        }
    }
}
