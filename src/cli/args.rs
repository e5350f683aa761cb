//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync`: Merge every source into fresh catalogs (dry run unless `--apply`)
//! - `init`: Initialize the catsync configuration file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::Origin;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(cmd)) => cmd.args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Directory to start looking for the config file from
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Only sync this language; `template` syncs the source template
    #[arg(long)]
    pub lang: Option<String>,

    /// Actually write catalogs (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Stream priority, highest first (overrides config file)
    /// Can be specified multiple times: --priority override --priority source
    #[arg(long, value_enum)]
    pub priority: Vec<Origin>,

    /// Exit with status 1 when any warning was raised
    #[arg(long)]
    pub deny_warnings: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub args: SyncArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge dataset, official translations, catalogs and overrides into catalogs
    Sync(SyncCommand),
    /// Initialize a new .catsyncrc.json configuration file
    Init,
}
