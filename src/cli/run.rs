//! Dispatch parsed arguments to the matching command handler.
//!
//! # Returns
//! - `Ok(CommandResult)` with diagnostic counts and the command summary
//! - `Err` if the command fails (e.g. invalid config file)

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, extract::extract, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
