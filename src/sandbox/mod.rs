//! Sandbox
//!
//! Path normalization and confinement of every path to the allowed root directories.

pub mod guard;
pub mod normalize;

pub use guard::Sandbox;
pub use normalize::normalize_path;
