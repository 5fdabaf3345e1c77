//! Implementation of `sift index`.

use std::{fs, process::ExitCode};

use sift_index::{IndexWriter, Item};

use crate::{cli::args::IndexCommand, config::Config};

/// Builds or updates an index from a JSON corpus file.
pub fn run(config: &Config, cmd: &IndexCommand) -> ExitCode {
    let contents = match fs::read_to_string(&cmd.input) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", cmd.input.display());
            return ExitCode::FAILURE;
        }
    };

    let items: Vec<Item> = match serde_json::from_str(&contents) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("error: failed to parse {}: {e}", cmd.input.display());
            return ExitCode::FAILURE;
        }
    };

    let language = cmd.language.as_deref().unwrap_or(&config.language);
    let mut writer = match IndexWriter::open_with_language(&cmd.output, language) {
        Ok(writer) => writer,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let staged = if cmd.replace {
        writer.delete_all().and_then(|()| writer.add_items(&items))
    } else {
        writer.add_items(&items)
    };

    match staged.and_then(|()| writer.commit()) {
        Ok(()) => {
            println!(
                "Indexed {} item{} into {}",
                items.len(),
                if items.len() == 1 { "" } else { "s" },
                cmd.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Leave the index as it was before this run.
            if let Err(rollback_err) = writer.rollback() {
                eprintln!("error: rollback failed: {rollback_err}");
            }
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
