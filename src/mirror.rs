//! # Tree Mirror
//!
//! Replaces the destination directory with a filtered copy of the fetched
//! checkout.
//!
//! ## Process
//!
//! 1.  **Remove**: if the destination exists it is deleted outright. There
//!     is no merge and no backup.
//!
//! 2.  **Copy**: the checkout is walked top-down. At each directory the
//!     inclusion filter is asked which entries to leave out; excluded
//!     directories are never descended into.
//!
//! Symlinks are followed, except a directory link that points back at one
//! of the directories currently being copied: that would recurse forever,
//! so it is skipped with a warning.
//!
//! A failure part-way through leaves the destination partially written.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filter::InclusionSpec;

/// Counts gathered while mirroring, reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSummary {
    pub files_copied: usize,
    pub directories_created: usize,
    pub entries_excluded: usize,
}

/// Replace `dest` with a copy of `source` filtered through `spec`.
pub fn mirror(source: &Path, dest: &Path, spec: &InclusionSpec) -> Result<MirrorSummary> {
    remove_existing(dest)?;

    info!("Syncing directory: {} -> {}.", source.display(), dest.display());

    let mut summary = MirrorSummary::default();
    let mut ancestors = vec![fs::canonicalize(source).map_err(|e| Error::mirror(source, e))?];
    copy_directory(source, source, dest, spec, &mut ancestors, &mut summary)?;
    Ok(summary)
}

fn remove_existing(dest: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(dest) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::mirror(dest, e)),
    };

    debug!("Removing existing directory: {}", dest.display());
    if metadata.is_dir() {
        fs::remove_dir_all(dest).map_err(|e| Error::mirror(dest, e))
    } else {
        fs::remove_file(dest).map_err(|e| Error::mirror(dest, e))
    }
}

/// `ancestors` holds the canonical paths of `src` and every directory above
/// it in the current descent.
fn copy_directory(
    root: &Path,
    src: &Path,
    dst: &Path,
    spec: &InclusionSpec,
    ancestors: &mut Vec<PathBuf>,
    summary: &mut MirrorSummary,
) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| Error::mirror(dst, e))?;
    summary.directories_created += 1;

    let mut names = fs::read_dir(src)
        .map_err(|e| Error::mirror(src, e))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<OsString>>>()
        .map_err(|e| Error::mirror(src, e))?;
    names.sort();

    let excluded = spec.decide_exclusions(root, src, &names);
    summary.entries_excluded += excluded.len();

    for name in names.iter().filter(|n| !excluded.contains(*n)) {
        let src_path = src.join(name);
        let dst_path = dst.join(name);

        // Follows symlinks, so a dangling link surfaces as an error here.
        let metadata = fs::metadata(&src_path).map_err(|e| Error::mirror(&src_path, e))?;

        if metadata.is_dir() {
            let canonical = fs::canonicalize(&src_path).map_err(|e| Error::mirror(&src_path, e))?;
            if ancestors.contains(&canonical) {
                warn!(
                    "Skipping symlink loop: {} -> {}",
                    src_path.display(),
                    canonical.display()
                );
                continue;
            }
            ancestors.push(canonical);
            let copied = copy_directory(root, &src_path, &dst_path, spec, ancestors, summary);
            ancestors.pop();
            copied?;
        } else if metadata.is_file() {
            fs::copy(&src_path, &dst_path).map_err(|e| Error::mirror(&dst_path, e))?;
            summary.files_copied += 1;
        } else {
            warn!("Skipping special file: {}", src_path.display());
        }
    }

    Ok(())
}
