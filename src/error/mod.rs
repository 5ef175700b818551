//! Error handling
//!
//! Defines error types and handling for the filesystem utilities.

pub mod handlers;
pub mod types;

pub use types::*;
