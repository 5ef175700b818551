//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::{Builder, Env};

/// Setup logging for the command line front end.
///
/// Defaults to `info`; `RUST_LOG` overrides it. Calling it twice is harmless.
pub fn setup_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .try_init();
}
