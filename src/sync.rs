//! # Sync Pipeline
//!
//! Runs one sync: fetch into a scratch directory, mirror into the
//! destination, then add missing package markers. The stages run strictly
//! in that order and each is attempted once.
//!
//! The scratch directory is held by a [`ScratchDir`] guard, so it is
//! removed on every exit path, whether the run succeeds, the fetch fails,
//! or the mirror fails half way.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use tempfile::TempDir;

use crate::config::SyncConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::git::{Fetcher, GitFetcher};
use crate::marker;
use crate::mirror::{self, MirrorSummary};

/// Temporary directory that is deleted when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    /// Only taken in `Drop`, to hand ownership to `TempDir::close`.
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh scratch directory under `parent`, or under the system
    /// temp dir when `parent` is `None`.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(defaults::SCRATCH_PREFIX);
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            debug!("Cleaning up {}", self.path.display());
            if let Err(e) = dir.close() {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub mirror: MirrorSummary,
    pub markers_created: Vec<PathBuf>,
}

/// Drives a sync run with a pluggable fetcher.
pub struct SyncRunner {
    fetcher: Box<dyn Fetcher>,
}

impl Default for SyncRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRunner {
    /// A runner that clones with the system `git`.
    pub fn new() -> Self {
        Self {
            fetcher: Box::new(GitFetcher),
        }
    }

    /// A runner using a custom fetcher, e.g. one copying a local fixture.
    pub fn with_fetcher(fetcher: Box<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Run the whole pipeline for `config`.
    ///
    /// Failures are logged at error level and returned unchanged.
    pub fn run(&self, config: &SyncConfig) -> Result<SyncSummary> {
        self.run_inner(config).inspect_err(|e| error!("Could not sync: {}", e))
    }

    fn run_inner(&self, config: &SyncConfig) -> Result<SyncSummary> {
        let scratch = ScratchDir::create(config.scratch_root.as_deref())?;
        let checkout = scratch.path().join("checkout");

        self.fetcher
            .fetch(&config.source, config.branch.as_deref(), &checkout)?;
        if !checkout.is_dir() {
            return Err(Error::Fetch {
                command: format!("fetch {}", config.source),
                status: "no checkout produced".to_string(),
                stderr: format!("{} does not exist", checkout.display()),
                hint: None,
            });
        }

        let mirror = mirror::mirror(&checkout, &config.destination, &config.inclusion)?;
        let markers_created =
            marker::ensure_markers(&config.destination, config.inclusion.marker_name())?;

        info!(
            "Synced {} files into {} ({} entries filtered, {} markers added).",
            mirror.files_copied,
            config.destination.display(),
            mirror.entries_excluded,
            markers_created.len()
        );

        Ok(SyncSummary {
            mirror,
            markers_created,
        })
    }
}

/// Run a sync with the default git fetcher.
pub fn run(config: &SyncConfig) -> Result<SyncSummary> {
    SyncRunner::new().run(config)
}
