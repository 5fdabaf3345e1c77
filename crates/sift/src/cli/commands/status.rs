//! Implementation of `sift status`.

use std::process::ExitCode;

use sift_index::{ClientOptions, IndexClient};

use crate::{cli::args::StatusCommand, config::Config};

/// Shows basic statistics for an index directory.
pub fn run(config: &Config, cmd: &StatusCommand) -> ExitCode {
    let options = ClientOptions {
        language: config.language.clone(),
        timeout: config.timeout(),
    };

    let client = match IndexClient::open(&cmd.index, &options) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match client.num_docs() {
        Ok(count) => {
            println!("Index: {}", cmd.index.display());
            println!(
                "   {count} document{}",
                if count == 1 { "" } else { "s" }
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
