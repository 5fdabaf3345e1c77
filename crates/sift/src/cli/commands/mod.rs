//! Command implementations and dispatch.

pub mod index;
pub mod search;
pub mod status;

use std::process::ExitCode;

use crate::{cli::args::Commands, config::Config};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, config: &Config) -> ExitCode {
    match command {
        Commands::Index(cmd) => index::run(config, &cmd),
        Commands::Search(cmd) => search::run(config, &cmd),
        Commands::Status(cmd) => status::run(config, &cmd),
    }
}
