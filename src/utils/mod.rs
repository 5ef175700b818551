//! Utility functions
//!
//! Provides logging setup and human-readable formatting.

pub mod format;
pub mod logging;
