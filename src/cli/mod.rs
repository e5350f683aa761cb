//! Command-line interface layer.
//!
//! Parses arguments, runs a command and prints its summary. Everything that
//! decides what ends up in a catalog lives in [`crate::core`].

use anyhow::Result;
use clap::CommandFactory;

mod args;
pub mod commands;
mod exit_status;
pub mod report;

pub use args::{Arguments, Command, SyncArgs, SyncCommand};
pub use exit_status::ExitStatus;

use commands::{init::init, sync::sync};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(command) = args.command else {
        Arguments::command().print_help().ok();
        return Ok(ExitStatus::Success);
    };

    let result = match command {
        Command::Sync(cmd) => sync(cmd)?,
        Command::Init => init()?,
    };
    report::print(&result);

    Ok(result.exit_status())
}
