//! Bounded symlink resolution for mapped library paths.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::config::MAX_SYMLINK_DEPTH;

/// Follow `path` through symlinks until it names something that is not a link.
///
/// Equivalent to [`resolve_with_limit`] with [`MAX_SYMLINK_DEPTH`].
pub fn resolve(path: &Path) -> PathBuf {
    resolve_with_limit(path, MAX_SYMLINK_DEPTH)
}

/// Follow `path` through at most `limit` symlink hops.
///
/// - A path that is not a symlink is returned unchanged.
/// - A missing or broken target ends resolution successfully at the last
///   path observed.
/// - If a link is still pending after `limit` hops (a cycle, or a chain that
///   is simply too long) the original `path` is returned unresolved.
///
/// Relative link targets are taken relative to the directory holding the link.
/// Targets containing `..` are applied against the physical directory when it
/// exists, falling back to lexical cleanup otherwise.
pub fn resolve_with_limit(path: &Path, limit: usize) -> PathBuf {
    let mut current = path.to_path_buf();

    for _ in 0..limit {
        if !is_symlink(&current) {
            return current;
        }
        match fs::read_link(&current) {
            Ok(target) => current = link_destination(&current, &target),
            // Raced with removal or permission change; stop here.
            Err(_) => return current,
        }
    }

    if is_symlink(&current) {
        debug!(path = %path.display(), limit, "symlink hop limit exceeded; keeping raw path");
        return path.to_path_buf();
    }
    current
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).map(|meta| meta.file_type().is_symlink()).unwrap_or(false)
}

fn link_destination(link: &Path, target: &Path) -> PathBuf {
    let joined = match link.parent() {
        Some(dir) if target.is_relative() => dir.join(target),
        _ => target.to_path_buf(),
    };
    if joined.components().any(|component| component == Component::ParentDir) {
        if let Some(physical) = apply_parent_dirs_physically(&joined) {
            return physical;
        }
    }
    normalize_lexically(&joined)
}

/// `..` follows the directory a path really lives in, which differs from the
/// textual parent once a directory symlink is involved. Only the directory part
/// is canonicalized so the final component can still be followed hop by hop.
fn apply_parent_dirs_physically(path: &Path) -> Option<PathBuf> {
    match path.file_name() {
        Some(name) => Some(fs::canonicalize(path.parent()?).ok()?.join(name)),
        None => fs::canonicalize(path).ok(),
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
