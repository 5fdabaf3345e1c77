//! Command-line interface for the `sift` faceted search tool.

mod cli;
mod config;

use std::{env, process::ExitCode};

use clap::Parser;

use crate::{cli::args::Cli, config::Config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: could not determine current directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load(&cwd) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    cli::commands::run(cli.command, &config)
}
