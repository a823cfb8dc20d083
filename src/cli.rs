// Command line: no subcommand runs the backfill.

use crate::version;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = version::NAME,
    version = version::VERSION,
    about = "Backfill OpenF1 meeting history, newest season first"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Scan seasons from the current year back to the floor year (default).
    Backfill,
    /// Print the season selection box.
    Seasons,
}

impl Cli {
    pub fn selected(&self) -> Command {
        self.command.unwrap_or(Command::Backfill)
    }
}
