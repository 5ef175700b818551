//! Path normalization
//!
//! Pure string transforms on paths. Nothing in here touches the filesystem.

use std::path::MAIN_SEPARATOR;

const PARENT: &str = "..";
const CURRENT: &str = ".";

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalize a path: unify separators, drop empty and `.` segments, and resolve `..`
/// against the preceding real segment.
///
/// Ascents that cannot be resolved are kept rather than dropped, both at the start
/// of a relative path (`../../x`) and directly after the filesystem root (`/../x`).
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with(is_separator);

    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split(is_separator) {
        match segment {
            "" | CURRENT => continue,
            PARENT => match stack.last() {
                None => stack.push(PARENT),
                Some(&top) if top == PARENT => stack.push(PARENT),
                Some(_) => {
                    stack.pop();
                }
            },
            other => stack.push(other),
        }
    }

    let separator = MAIN_SEPARATOR.to_string();
    let joined = stack.join(&separator);
    if absolute {
        format!("{}{}", MAIN_SEPARATOR, joined)
    } else {
        joined
    }
}

/// Whether a normalized path is the filesystem root
pub fn is_root(normalized_path: &str) -> bool {
    normalized_path.len() == MAIN_SEPARATOR.len_utf8() && normalized_path.starts_with(MAIN_SEPARATOR)
}

/// Return the parent directory of a normalized path, with `dirname` semantics:
/// the parent of a top-level entry is the root, the parent of a bare name is `.`,
/// and the root is its own parent.
pub fn parent_path(normalized_path: &str) -> String {
    match normalized_path.rfind(MAIN_SEPARATOR) {
        Some(0) => MAIN_SEPARATOR.to_string(),
        Some(pos) => normalized_path[..pos].to_string(),
        None => CURRENT.to_string(),
    }
}

/// Append an entry name to a directory path
pub fn join_path(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        name.to_string()
    } else if directory.ends_with(MAIN_SEPARATOR) {
        format!("{}{}", directory, name)
    } else {
        format!("{}{}{}", directory, MAIN_SEPARATOR, name)
    }
}

/// Whether `path` equals `base` or lies below it, comparing whole segments
pub fn is_within(path: &str, base: &str) -> bool {
    match path.strip_prefix(base) {
        Some("") => true,
        Some(rest) => base.ends_with(MAIN_SEPARATOR) || rest.starts_with(MAIN_SEPARATOR),
        None => false,
    }
}
