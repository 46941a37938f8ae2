//! # Inclusion Filter
//!
//! Decides, one directory at a time, which entries of the fetched checkout
//! are left out of the mirrored copy. The tree mirror asks for a decision
//! right before it descends into a directory, so an excluded directory
//! prunes its whole subtree.
//!
//! ## Rules
//!
//! For an entry `f` in `dir`, with `p = dir/f`:
//!
//! 1.  `p` is not a directory, does not carry the source extension, and
//!     include patterns are configured: excluded unless some pattern
//!     matches. A match includes it outright.
//! 2.  `p` is a regular file without the source extension: excluded.
//! 3.  `p` is a directory without a marker file directly inside it:
//!     excluded.
//! 4.  Everything else is included.
//!
//! The include-all pattern (`*`) switches the filter off for the run.

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use glob::Pattern;
use log::debug;

use crate::defaults;
use crate::error::{Error, Result};

/// Outcome of the filter for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Included,
    Excluded,
}

/// The set of include patterns plus the two names the default rules key on.
#[derive(Debug, Clone)]
pub struct InclusionSpec {
    patterns: Vec<Pattern>,
    include_all: bool,
    /// Source suffix including the leading dot, e.g. `.py`.
    source_suffix: String,
    marker: String,
}

impl Default for InclusionSpec {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            include_all: false,
            source_suffix: format!(".{}", defaults::SOURCE_EXTENSION),
            marker: defaults::MARKER_FILE.to_string(),
        }
    }
}

impl InclusionSpec {
    /// Create a spec with no include patterns; only the default rules apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse include tokens such as `inc=*.yaml` or plain `*.yaml`.
    ///
    /// `*` (with or without the prefix) disables filtering. Empty tokens are
    /// ignored. Invalid glob syntax is reported as a configuration error.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Self::new();
        for token in tokens {
            spec.add_token(token.as_ref())?;
        }
        Ok(spec)
    }

    fn add_token(&mut self, token: &str) -> Result<()> {
        let raw = token
            .trim()
            .strip_prefix(defaults::INCLUDE_PREFIX)
            .unwrap_or(token.trim());

        if raw.is_empty() {
            return Ok(());
        }
        if raw == defaults::INCLUDE_ALL {
            self.include_all = true;
            return Ok(());
        }

        let pattern = Pattern::new(raw).map_err(|e| Error::Config {
            message: format!("Invalid include pattern '{}': {}", raw, e),
            hint: Some("Patterns use shell-style wildcards: *, ? and [...]".to_string()),
        })?;
        self.patterns.push(pattern);
        Ok(())
    }

    /// Use a different source extension; a leading dot is optional.
    pub fn with_source_extension(mut self, extension: &str) -> Self {
        self.source_suffix = format!(".{}", extension.trim_start_matches('.'));
        self
    }

    /// Use a different package-marker file name.
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    /// Whether the include-all pattern was given.
    pub fn includes_everything(&self) -> bool {
        self.include_all
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn marker_name(&self) -> &str {
        &self.marker
    }

    /// Whether `name` carries the recognized source extension.
    pub fn is_source_name(&self, name: &OsStr) -> bool {
        name.to_string_lossy().ends_with(&self.source_suffix)
    }

    /// Whether `dir` directly contains the package-marker file.
    pub fn is_package_dir(&self, dir: &Path) -> bool {
        dir.join(&self.marker).is_file()
    }

    /// Decide which of `entries` (names inside `dir`) are excluded.
    ///
    /// `root` is the top of the tree being mirrored; include patterns are
    /// matched against the entry path relative to it.
    pub fn decide_exclusions<I, S>(&self, root: &Path, dir: &Path, entries: I) -> BTreeSet<OsString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if self.include_all {
            return BTreeSet::new();
        }

        entries
            .into_iter()
            .filter(|name| self.decide(root, dir, name.as_ref()) == FilterDecision::Excluded)
            .map(|name| name.as_ref().to_os_string())
            .collect()
    }

    /// Decide a single entry.
    pub fn decide(&self, root: &Path, dir: &Path, name: &OsStr) -> FilterDecision {
        if self.include_all {
            return FilterDecision::Included;
        }

        let path = dir.join(name);
        let is_dir = path.is_dir();
        let is_source = self.is_source_name(name);

        if !is_dir && !is_source && !self.patterns.is_empty() {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if self.matches_any(relative) {
                debug!(
                    "Including file, which matches include filters ({}): {}",
                    self.describe_patterns(),
                    relative.display()
                );
                return FilterDecision::Included;
            }
            debug!(
                "Not syncing {}, does not match include filters ({})",
                relative.display(),
                self.describe_patterns()
            );
            return FilterDecision::Excluded;
        }

        if path.is_file() && !is_source {
            debug!("Not syncing file: {}", name.to_string_lossy());
            return FilterDecision::Excluded;
        }

        if is_dir && !self.is_package_dir(&path) {
            debug!("Not syncing directory: {}", name.to_string_lossy());
            return FilterDecision::Excluded;
        }

        FilterDecision::Included
    }

    fn matches_any(&self, relative: &Path) -> bool {
        self.patterns.iter().any(|p| p.matches_path(relative))
    }

    fn describe_patterns(&self) -> String {
        self.patterns
            .iter()
            .map(Pattern::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
