use log::debug;
use std::io::{self, Read, Write};

use crate::commands::parser::Command;
use crate::error::FsError;
use crate::info::{DEFAULT_DISK_SPACE_PATH, process_group, process_owner};
use crate::sandbox::normalize_path;
use crate::storage::{
    ContentKind, ContentNode, DirectoryContentTree, ListOptions, Storage, WriteOptions,
};
use crate::utils::format::human_readable_bytes;

// Handle a single command and write its output
pub fn handle_command(
    storage: &Storage,
    command: Command,
    out: &mut impl Write,
) -> Result<(), FsError> {
    debug!("Handling {:?}", command);

    match command {
        Command::Normalize { path } => writeln!(out, "{}", normalize_path(&path))?,
        Command::DiskSpace { path, si } => {
            let path = path
                .or_else(|| storage.sandbox().roots().first().cloned())
                .unwrap_or_else(|| DEFAULT_DISK_SPACE_PATH.to_string());
            let space = storage.disk_space(&path)?;
            writeln!(
                out,
                "total {}, free {}, used {}",
                human_readable_bytes(space.total, si),
                human_readable_bytes(space.free, si),
                human_readable_bytes(space.used, si)
            )?;
        }
        Command::Whoami => {
            let user = process_owner()?;
            let group = process_group()?;
            writeln!(
                out,
                "{} (uid {}) {} (gid {})",
                user.name, user.uid, group.name, group.gid
            )?;
        }
        Command::Owner { path } => {
            let owner = storage.path_owner(&path)?;
            writeln!(out, "{} (uid {})", owner.name, owner.uid)?;
        }
        Command::Group { path } => {
            let group = storage.path_group(&path)?;
            writeln!(out, "{} (gid {})", group.name, group.gid)?;
        }
        Command::Mode { path, octal } => writeln!(out, "{}", storage.path_mode(&path, octal)?)?,
        Command::Permissions { path } => writeln!(out, "{}", storage.path_permissions(&path)?)?,
        Command::Mkdir {
            path,
            mode,
            no_parents,
        } => {
            let mut options = *storage.create_options();
            if let Some(mode) = mode {
                options.mode = mode;
            }
            options.create_missing_parents = !no_parents;
            report(out, storage.create_directory_if_missing(&path, &options)?, "created", "exists")?;
        }
        Command::IsEmpty { path } => writeln!(out, "{}", storage.is_directory_empty(&path)?)?,
        Command::Ls {
            path,
            recursive,
            names,
            kinds,
        } => {
            let options = ListOptions {
                recursive,
                full_paths: !names,
                included_kinds: if kinds.is_empty() {
                    ContentKind::ALL.to_vec()
                } else {
                    kinds
                },
            };
            let content = storage.list_directory_content(&path, &options)?;
            write_tree(out, &content, 0)?;
        }
        Command::Clear { path } => report(
            out,
            storage.delete_directory_content_if_exists(&path)?,
            "cleared",
            "already empty",
        )?,
        Command::Rmdir { path, with_content } => report(
            out,
            storage.delete_directory_if_exists(&path, with_content)?,
            "deleted",
            "absent",
        )?,
        Command::CopyDir(args) => report(
            out,
            storage.copy_directory(&args.source, &args.destination, &args.options())?,
            "copied, content overwritten",
            "copied",
        )?,
        Command::MoveDir(args) => report(
            out,
            storage.move_directory(&args.source, &args.destination, &args.options())?,
            "moved, content overwritten",
            "moved",
        )?,
        Command::Copy(args) => report(
            out,
            storage.copy_file(&args.source, &args.destination, &args.options())?,
            "copied, destination overwritten",
            "copied",
        )?,
        Command::Move(args) => report(
            out,
            storage.move_file(&args.source, &args.destination, &args.options())?,
            "moved, destination overwritten",
            "moved",
        )?,
        Command::ChmodDir {
            mode,
            path,
            recursive,
            all,
        } => storage.chmod_directory(&path, mode, recursive, !all)?,
        Command::Chmod { mode, path } => storage.chmod_file(&path, mode)?,
        Command::Cat { path } => out.write_all(&storage.read_file(&path)?)?,
        Command::Write {
            path,
            content,
            append,
            parents,
        } => {
            let data = match content {
                Some(content) => content.into_bytes(),
                None => {
                    let mut buffer = Vec::new();
                    io::stdin().read_to_end(&mut buffer)?;
                    buffer
                }
            };
            let options = WriteOptions {
                append,
                create_missing_parents: parents,
            };
            let written = storage.write_file(&path, &data, &options)?;
            writeln!(out, "{} bytes written", written)?;
        }
        Command::Rm { path } => {
            report(out, storage.delete_file_if_exists(&path)?, "deleted", "absent")?
        }
    }

    Ok(())
}

fn report(out: &mut impl Write, outcome: bool, yes: &str, no: &str) -> io::Result<()> {
    writeln!(out, "{}", if outcome { yes } else { no })
}

/// Print a listing, sub-trees indented under their directory
fn write_tree(out: &mut impl Write, tree: &DirectoryContentTree, depth: usize) -> io::Result<()> {
    for (name, node) in tree {
        let indent = "  ".repeat(depth);
        match node {
            ContentNode::Kind(kind) => writeln!(out, "{}{} [{}]", indent, name, kind)?,
            ContentNode::Tree(sub_tree) => {
                writeln!(out, "{}{} [{}]", indent, name, ContentKind::Directory)?;
                write_tree(out, sub_tree, depth + 1)?;
            }
        }
    }
    Ok(())
}
