//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract every query fragment under the source root
//! - `init`: Initialize a quarry configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory (overrides the current directory)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print fragments, component state and diagnostics as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip `<StaticQuery>` elements (overrides config file)
    #[arg(long)]
    pub no_static_query_elements: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract page, static and hook queries from component files
    Extract(ExtractCommand),
    /// Initialize a new .quarryrc.json configuration file
    Init,
}
