//! Project path helpers.
//!
//! Project paths always use `/`. Windows separators are accepted on input and
//! converted.

use crate::{VfsError, VfsResult};

/// Canonical form of a project path: `/`-separated, no empty or `.`
/// segments, no leading or trailing `/`.
///
/// `..` is rejected so that a mount can never be escaped.
pub fn normalize(path: &str) -> VfsResult<String> {
    let invalid = |reason| VfsError::InvalidPath {
        path: path.to_owned(),
        reason,
    };

    let mut parts = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => return Err(invalid("parent segments are not allowed")),
            part => parts.push(part),
        }
    }
    if parts.is_empty() {
        return Err(invalid("path is empty"));
    }
    Ok(parts.join("/"))
}

/// Last segment of `path`.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File name without its extension: `"prefabs/Enemy.canvas"` gives
/// `"Enemy"`. Dot files keep their leading dot.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Extension of the file name, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => Some(&name[dot + 1..]),
        _ => None,
    }
}

/// Appends `name` to the directory `dir` (`""` is the mount root).
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Splits a normalized path into its first segment and the remainder.
pub(crate) fn split_source(path: &str) -> (&str, &str) {
    path.split_once('/').unwrap_or((path, ""))
}
