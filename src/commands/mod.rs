//! Command-line front end
//!
//! Parses arguments into a [`Command`] and runs it against a [`crate::Storage`].

mod handlers;
mod parser;

pub use handlers::handle_command;
pub use parser::{Cli, Command, TransferArgs};
