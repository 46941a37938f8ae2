//! CLI argument parsing, logging setup and dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, LevelFilter};

use git_sync::config::{self, Settings, SyncConfig};
use git_sync::sync::SyncRunner;

/// git-sync - Mirror a filtered snapshot of a git branch into a directory
#[derive(Parser, Debug)]
#[command(name = "git-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source repository URL or path
    #[arg(short, long, value_name = "URL", env = "GIT_SYNC_SOURCE")]
    source: Option<String>,

    /// Sync destination directory (replaced on every run)
    #[arg(short, long, value_name = "PATH", env = "GIT_SYNC_DESTINATION")]
    destination: Option<PathBuf>,

    /// Branch or tag to check out (defaults to the remote's default branch)
    #[arg(short, long, value_name = "NAME")]
    branch: Option<String>,

    /// Include files matching GLOB (repeatable, `inc=` prefix optional); `*` disables filtering
    #[arg(short, long = "include", value_name = "GLOB")]
    include: Vec<String>,

    /// YAML config file; flags override its values
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Source file extension that is always synced
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,

    /// Package marker file name
    #[arg(long, value_name = "NAME")]
    marker: Option<String>,

    /// Directory in which the scratch checkout is created
    #[arg(long, value_name = "PATH", env = "GIT_SYNC_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    debug: bool,
}

impl Cli {
    /// Execute the sync described by the arguments
    pub fn execute(self) -> Result<()> {
        init_logging(self.debug);

        let config = self.build_config().inspect_err(|e| error!("{}", e))?;
        SyncRunner::new().run(&config)?;
        Ok(())
    }

    fn build_config(&self) -> git_sync::error::Result<SyncConfig> {
        let file_settings = match &self.config {
            Some(path) => config::from_file(path)?,
            None => Settings::default(),
        };

        let flag_settings = Settings {
            source: self.source.clone(),
            destination: self.destination.clone(),
            branch: self.branch.clone(),
            include: self.include.clone(),
            extension: self.extension.clone(),
            marker: self.marker.clone(),
        };

        let mut config = file_settings.merge(flag_settings).into_config()?;
        config.scratch_root = self.scratch_dir.clone();
        Ok(config)
    }
}

/// Initialize `env_logger` at info level, or debug with `--debug`.
///
/// `RUST_LOG` still takes precedence when set.
fn init_logging(debug: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(debug))
        .format_target(false)
        .parse_default_env()
        .try_init();
}

fn log_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
