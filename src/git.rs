//! Shallow git checkouts of the upstream repository.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Trait for fetch operations - allows substituting a local fixture in tests
pub trait Fetcher {
    /// Place a snapshot of `url` (at `branch`, or the remote default) in
    /// `target_dir`.
    fn fetch(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()>;
}

/// The default `Fetcher`, which shells out to the system `git` command.
///
/// Using the system binary picks up SSH keys, credential helpers and any
/// authentication configured in `~/.gitconfig`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl Fetcher for GitFetcher {
    fn fetch(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
        clone_shallow(url, branch, target_dir)?;
        strip_git_metadata(target_dir)
    }
}

/// Build the argument list for a quiet, depth-1 clone.
pub fn clone_args(url: &str, branch: Option<&str>, target_dir: &Path) -> Vec<String> {
    let mut args = vec![
        "clone".to_string(),
        "--quiet".to_string(),
        "--depth=1".to_string(),
    ];
    if let Some(branch) = branch {
        args.push(format!("--branch={}", branch));
    }
    args.push(url.to_string());
    args.push(target_dir.display().to_string());
    args
}

/// Clone `url` with history depth 1 into `target_dir`
///
/// `target_dir` must be absent or empty. With no branch, git checks out
/// whatever the remote's HEAD points at.
pub fn clone_shallow(url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
    info!(
        "Checking out {} ({}) to {}.",
        redact_url(url),
        branch.unwrap_or("default branch"),
        target_dir.display()
    );

    let args = clone_args(url, branch, target_dir);
    let command = format!("git {}", args.join(" ")).replace(url, &redact_url(url));

    let output = Command::new("git")
        .args(&args)
        .output()
        .map_err(|e| Error::Fetch {
            command: command.clone(),
            status: "not started".to_string(),
            stderr: e.to_string(),
            hint: Some("Make sure git is installed and on PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = auth_hint(&stderr);
        return Err(Error::Fetch {
            command,
            status: output.status.to_string(),
            stderr,
            hint,
        });
    }

    Ok(())
}

fn auth_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some(
            "Make sure you have access to the repository. For private repos, \
             check your SSH agent, git credentials or personal access token"
                .to_string(),
        )
    } else {
        None
    }
}

/// Remove the `.git` directory from a fresh checkout.
///
/// The checkout is only ever used as a snapshot, so the history never needs
/// to reach the destination.
pub fn strip_git_metadata(checkout: &Path) -> Result<()> {
    let git_dir = checkout.join(".git");
    if git_dir.is_dir() {
        debug!("Removing git metadata: {}", git_dir.display());
        fs::remove_dir_all(&git_dir)?;
    }
    Ok(())
}

/// Mask any password embedded in a remote URL so it never reaches the logs.
///
/// Inputs that are not URLs (local paths, scp-style `git@host:repo`) are
/// returned unchanged.
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_ok() {
                parsed.to_string()
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}
