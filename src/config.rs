//! # Run Configuration
//!
//! A sync run is described by one [`SyncConfig`] value, built once at
//! startup and passed by reference to every stage. It is assembled from two
//! layers of [`Settings`]:
//!
//! 1.  an optional YAML file (`--config`),
//! 2.  command-line flags, which override the file.
//!
//! ## File Format
//!
//! ```yaml
//! source: https://github.com/juju/charm-helpers
//! destination: hooks/charmhelpers
//! branch: master
//! include:
//!   - "*.yaml"
//! extension: py
//! marker: __init__.py
//! ```
//!
//! Every key is optional in the file, but `source` and `destination` must be
//! known once both layers are merged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filter::InclusionSpec;

/// One layer of partially specified settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub source: Option<String>,
    pub destination: Option<PathBuf>,
    pub branch: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    pub extension: Option<String>,
    pub marker: Option<String>,
}

impl Settings {
    /// Layer `overrides` on top of `self`.
    ///
    /// Scalar values from `overrides` win; include patterns accumulate, file
    /// patterns first.
    pub fn merge(mut self, overrides: Settings) -> Settings {
        self.source = overrides.source.or(self.source);
        self.destination = overrides.destination.or(self.destination);
        self.branch = overrides.branch.or(self.branch);
        self.extension = overrides.extension.or(self.extension);
        self.marker = overrides.marker.or(self.marker);
        self.include.extend(overrides.include);
        self
    }

    /// Validate the merged settings into a runnable configuration.
    pub fn into_config(self) -> Result<SyncConfig> {
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: "No source repo specified as an option".to_string(),
                hint: Some("Pass --source <URL> or set 'source' in the config file".to_string()),
            })?;

        let destination = self
            .destination
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or_else(|| Error::Config {
                message: "No destination dir. specified as option or config".to_string(),
                hint: Some(
                    "Pass --destination <PATH> or set 'destination' in the config file"
                        .to_string(),
                ),
            })?;

        let mut inclusion = InclusionSpec::from_tokens(&self.include)?;
        if let Some(extension) = self.extension.as_deref() {
            inclusion = inclusion.with_source_extension(extension);
        }
        if let Some(marker) = self.marker.as_deref() {
            if marker.is_empty() || marker.contains(['/', '\\']) {
                return Err(Error::config(format!(
                    "Marker must be a plain file name, got '{}'",
                    marker
                )));
            }
            inclusion = inclusion.with_marker(marker);
        }

        Ok(SyncConfig {
            source,
            destination,
            branch: self.branch.filter(|b| !b.trim().is_empty()),
            inclusion,
            scratch_root: None,
        })
    }
}

/// Parse settings from YAML text. An empty document yields empty settings.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    if yaml_content.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_str(yaml_content)?)
}

/// Read and parse a settings file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Could not read config file '{}': {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

/// Everything one sync run needs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Remote repository location handed to `git clone`.
    pub source: String,
    /// Directory that is replaced by the filtered copy.
    pub destination: PathBuf,
    /// Branch or tag to clone; `None` follows the remote's default branch.
    pub branch: Option<String>,
    pub inclusion: InclusionSpec,
    /// Parent for the scratch checkout; `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl SyncConfig {
    /// Minimal configuration with default filtering.
    pub fn new(source: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            branch: None,
            inclusion: InclusionSpec::new(),
            scratch_root: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_inclusion(mut self, inclusion: InclusionSpec) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(scratch_root.into());
        self
    }
}
