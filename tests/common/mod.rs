//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fixtures for building upstream trees (optionally as
//! real git repositories) and a destination workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_upstream_file("pkg/a.py", "A = 1");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Check if a usable `git` binary is on PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary workspace holding an upstream tree, a destination and a
/// scratch root.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_upstream_file("pkg/__init__.py", "")
///     .with_upstream_file("pkg/a.py", "A = 1")
///     .commit_upstream();
///
/// fixture.command().assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new fixture with empty `upstream/` and `scratch/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("upstream")
            .create_dir_all()
            .expect("Failed to create upstream directory");
        temp_dir
            .child("scratch")
            .create_dir_all()
            .expect("Failed to create scratch directory");
        Self { temp_dir }
    }

    /// Add a file to the upstream tree.
    pub fn with_upstream_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("upstream")
            .child(path)
            .write_str(content)
            .expect("Failed to write upstream file");
        self
    }

    /// Add a file to the destination, e.g. stale content from an earlier run.
    pub fn with_destination_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("dest")
            .child(path)
            .write_str(content)
            .expect("Failed to write destination file");
        self
    }

    /// Turn the upstream tree into a git repository with one commit on `main`.
    pub fn commit_upstream(self) -> Self {
        let upstream = self.upstream();
        run_git(&upstream, &["init", "--quiet", "--initial-branch=main"]);
        run_git(&upstream, &["add", "--all"]);
        run_git(
            &upstream,
            &[
                "-c",
                "user.name=git-sync tests",
                "-c",
                "user.email=tests@example.com",
                "commit",
                "--quiet",
                "-m",
                "initial",
            ],
        );
        self
    }

    /// Create a branch at the current upstream commit and add a file on it.
    pub fn with_upstream_branch(self, branch: &str, path: &str, content: &str) -> Self {
        let upstream = self.upstream();
        run_git(&upstream, &["checkout", "--quiet", "-b", branch]);
        self.temp_dir
            .child("upstream")
            .child(path)
            .write_str(content)
            .expect("Failed to write upstream file");
        run_git(&upstream, &["add", "--all"]);
        run_git(
            &upstream,
            &[
                "-c",
                "user.name=git-sync tests",
                "-c",
                "user.email=tests@example.com",
                "commit",
                "--quiet",
                "-m",
                branch,
            ],
        );
        run_git(&upstream, &["checkout", "--quiet", "main"]);
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn upstream(&self) -> PathBuf {
        self.path().join("upstream")
    }

    pub fn dest(&self) -> PathBuf {
        self.path().join("dest")
    }

    pub fn scratch(&self) -> PathBuf {
        self.path().join("scratch")
    }

    /// Whether every scratch checkout has been cleaned up.
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch())
            .expect("Failed to read scratch directory")
            .next()
            .is_none()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a `git-sync` command pointed at this fixture's upstream,
    /// destination and scratch root.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-sync");
        cmd.current_dir(self.path())
            .env_remove("GIT_SYNC_SOURCE")
            .env_remove("GIT_SYNC_DESTINATION")
            .env_remove("RUST_LOG")
            .arg("--source")
            .arg(self.upstream())
            .arg("--destination")
            .arg(self.dest())
            .arg("--scratch-dir")
            .arg(self.scratch());
        cmd
    }
}

#[allow(dead_code)]
fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_layout() {
        let fixture = TestFixture::new();
        assert!(fixture.upstream().is_dir());
        assert!(fixture.scratch().is_dir());
        assert!(!fixture.dest().exists());
    }

    #[test]
    fn test_fixture_with_files() {
        let fixture = TestFixture::new()
            .with_upstream_file("pkg/a.py", "A = 1")
            .with_destination_file("stale.txt", "old");
        assert!(fixture.upstream().join("pkg/a.py").exists());
        assert!(fixture.dest().join("stale.txt").exists());
    }
}
