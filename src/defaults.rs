//! Default values for git-sync configuration.
//!
//! This module provides centralized default values used across the filter,
//! the marker pass and the CLI, ensuring they never drift apart.

/// Extension of files that are always sync candidates, without the dot.
pub const SOURCE_EXTENSION: &str = "py";

/// Zero-byte file whose presence marks a directory as an importable package.
pub const MARKER_FILE: &str = "__init__.py";

/// Include pattern that turns filtering off for the whole run.
pub const INCLUDE_ALL: &str = "*";

/// Optional prefix accepted on include tokens, as in `inc=*.yaml`.
pub const INCLUDE_PREFIX: &str = "inc=";

/// Prefix for scratch checkout directories.
pub const SCRATCH_PREFIX: &str = "git-sync-";
