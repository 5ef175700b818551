use clap::{Args, Parser, Subcommand};

use crate::info::mode::parse_octal_mode;
use crate::storage::{ContentKind, TransferOptions};

/// Sandboxed filesystem operations
#[derive(Debug, Parser)]
#[command(name = "sandboxed-fs", version, about)]
pub struct Cli {
    /// Config file (TOML, extension optional)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by the copy and move commands
#[derive(Debug, Args, PartialEq, Eq)]
pub struct TransferArgs {
    pub source: String,
    pub destination: String,
    /// Replace colliding destination entries
    #[arg(long)]
    pub overwrite: bool,
    /// Fail instead of creating a missing destination parent
    #[arg(long)]
    pub no_parents: bool,
}

impl TransferArgs {
    pub fn options(&self) -> TransferOptions {
        TransferOptions {
            create_missing_parents: !self.no_parents,
            overwrite: self.overwrite,
        }
    }
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print the normalized form of a path
    Normalize { path: String },
    /// Show total, free and used space of the filesystem holding a path
    DiskSpace {
        path: Option<String>,
        /// Use powers of 1000 instead of 1024
        #[arg(long)]
        si: bool,
    },
    /// Show the user and group of this process
    Whoami,
    /// Show the user owning a path
    Owner { path: String },
    /// Show the group owning a path
    Group { path: String },
    /// Show the mode of a path
    Mode {
        path: String,
        #[arg(long)]
        octal: bool,
    },
    /// Show owner, group and mode of a path
    Permissions { path: String },
    /// Create a directory unless it exists
    Mkdir {
        path: String,
        #[arg(long, value_parser = parse_mode)]
        mode: Option<u32>,
        #[arg(long)]
        no_parents: bool,
    },
    /// Check whether a directory is empty
    IsEmpty { path: String },
    /// List directory content
    Ls {
        path: String,
        #[arg(short, long)]
        recursive: bool,
        /// Show entry names instead of full paths
        #[arg(long)]
        names: bool,
        /// Only list these kinds (directory, file, link)
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<ContentKind>,
    },
    /// Delete everything inside a directory
    Clear { path: String },
    /// Delete a directory
    Rmdir {
        path: String,
        #[arg(long)]
        with_content: bool,
    },
    /// Copy a directory with its content
    CopyDir(TransferArgs),
    /// Move a directory with its content
    MoveDir(TransferArgs),
    /// Copy a file
    Copy(TransferArgs),
    /// Move a file
    Move(TransferArgs),
    /// Change the mode of a directory
    ChmodDir {
        #[arg(value_parser = parse_mode)]
        mode: u32,
        path: String,
        #[arg(short, long)]
        recursive: bool,
        /// Also change files, not only sub-directories
        #[arg(long)]
        all: bool,
    },
    /// Change the mode of a file
    Chmod {
        #[arg(value_parser = parse_mode)]
        mode: u32,
        path: String,
    },
    /// Print the content of a file
    Cat { path: String },
    /// Write text to a file, read from stdin when no content is given
    Write {
        path: String,
        content: Option<String>,
        #[arg(long)]
        append: bool,
        /// Create missing parent directories
        #[arg(long)]
        parents: bool,
    },
    /// Delete a file
    Rm { path: String },
}

fn parse_mode(raw: &str) -> Result<u32, String> {
    parse_octal_mode(raw).ok_or_else(|| format!("invalid octal mode: {}", raw))
}
