//! Package-marker pass over the mirrored tree.
//!
//! Every directory in the marker scope gets an empty marker file so the
//! tree is importable, and so the next run's filter recognizes it as a
//! package.

use std::fs::OpenOptions;
use std::path::{Component, Path, PathBuf};

use log::info;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Directory whose subtree the marker pass covers for `root`.
///
/// This is the first two segments of `root`: `hooks/helpers/foo` is covered
/// from `hooks/helpers`. A root with fewer segments covers itself. Absolute
/// roots, and roots that climb out through `..` in their first two
/// segments, also cover only themselves; the pass never walks a
/// filesystem-level ancestor like `/tmp`.
pub fn marker_scope(root: &Path) -> PathBuf {
    if root.has_root() {
        return root.to_path_buf();
    }

    let mut segments = root
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .take(2)
        .peekable();

    if segments.peek().is_none() {
        return root.to_path_buf();
    }

    let mut scope = PathBuf::new();
    for segment in segments {
        match segment {
            Component::Normal(name) => scope.push(name),
            _ => return root.to_path_buf(),
        }
    }
    scope
}

/// Create `marker_name` in every directory of the scope of `root` that
/// lacks one. Returns the markers created.
///
/// Existing markers are left alone, so a second run creates nothing.
pub fn ensure_markers(root: &Path, marker_name: &str) -> Result<Vec<PathBuf>> {
    let scope = marker_scope(root);
    let mut created = Vec::new();

    for entry in WalkDir::new(&scope).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(scope.as_path()).to_path_buf();
            Error::marker(path, e)
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let marker = entry.path().join(marker_name);
        if marker.exists() {
            continue;
        }

        info!("Adding missing {}: {}", marker_name, marker.display());
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker)
            .map_err(|e| Error::marker(&marker, e))?;
        created.push(marker);
    }

    Ok(created)
}
