//! # git-sync CLI
//!
//! This is the binary entry point for the `git-sync` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Running the sync and turning failures into a non-zero exit status.
//!
//! The sync logic lives in the `git_sync` library crate; the binary is a
//! thin wrapper around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
