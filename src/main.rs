//! sandboxed-fs - Entry Point
//!
//! Runs one filesystem operation confined to the configured allowed directories.

use clap::Parser;
use log::info;
use std::io;
use std::sync::Arc;

use sandboxed_fs::commands::{Cli, handle_command};
use sandboxed_fs::error::FsError;
use sandboxed_fs::error::handlers::{error_to_exit_code, handle_error};
use sandboxed_fs::utils::logging::setup_logging;
use sandboxed_fs::{FsConfig, Storage};

fn run(cli: Cli) -> Result<(), FsError> {
    let config = match cli.config.as_deref() {
        Some(path) => FsConfig::load_from(path)?,
        None => FsConfig::load()?,
    };
    let sandbox = config.build_sandbox()?;
    info!("Sandbox roots: {:?}", sandbox.roots());

    let storage = Storage::new(Arc::new(sandbox)).with_create_options(config.create_options()?);
    let mut stdout = io::stdout().lock();
    handle_command(&storage, cli.command, &mut stdout)
}

fn main() {
    setup_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        handle_error(&e);
        std::process::exit(error_to_exit_code(&e));
    }
}
