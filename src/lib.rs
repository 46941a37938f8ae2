//! # git-sync Library
//!
//! This library vendors a filtered snapshot of a git branch into a local
//! directory. It backs the `git-sync` command-line tool, and can be driven
//! directly from other programs.
//!
//! ## Quick Example
//!
//! ```no_run
//! use git_sync::config::SyncConfig;
//! use git_sync::filter::InclusionSpec;
//!
//! let config = SyncConfig::new("https://github.com/juju/charm-helpers", "hooks/charmhelpers")
//!     .with_branch("master")
//!     .with_inclusion(InclusionSpec::from_tokens(["inc=*.yaml"]).unwrap());
//!
//! let summary = git_sync::sync::run(&config).unwrap();
//! println!("{} files synced", summary.mirror.files_copied);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the explicit `SyncConfig` value for a run,
//!   merged from an optional YAML file and command-line flags.
//! - **Fetching (`git`)**: shallow, quiet `git clone` into a scratch
//!   directory.
//! - **Filtering (`filter`)**: per-directory inclusion decisions. Source
//!   files and marked package directories are kept; include patterns can
//!   rescue other files.
//! - **Mirroring (`mirror`)**: destructive replacement of the destination
//!   with the filtered copy.
//! - **Markers (`marker`)**: empty package-marker files added so the result
//!   is importable.
//!
//! ## Execution Flow
//!
//! `sync::SyncRunner` runs the stages in order:
//!
//! 1.  **Fetch**: clone the branch into a scratch directory.
//! 2.  **Mirror**: delete the destination and copy the filtered checkout.
//! 3.  **Mark**: add missing package markers.
//!
//! The scratch directory is removed whatever the outcome.

pub mod config;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod git;
pub mod marker;
pub mod mirror;
pub mod sync;
