//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sift_index::ResultEnvelope;
use sift_query::{FacetSelection, facet};

/// Prints a result envelope as pretty JSON or as text tables.
///
/// `selections` are the facet selections already applied, needed to build
/// navigation links that add one more selection on top of them.
pub fn output_envelope(
    envelope: &ResultEnvelope,
    json: bool,
    links: Option<&str>,
    selections: &[FacetSelection],
) -> ExitCode {
    if json {
        return match serde_json::to_string_pretty(envelope) {
            Ok(json_str) => {
                println!("{json_str}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if envelope.hits.is_empty() {
        println!("No results found.");
    } else {
        print_hits(envelope);
    }

    println!(
        "{} of {} result{}",
        envelope.hits.len(),
        envelope.total_count,
        if envelope.total_count == 1 { "" } else { "s" }
    );

    for (field, counts) in &envelope.facets {
        println!();
        println!("{field}:");
        for count in counts {
            println!("   {} ({})", count.value, count.count);
        }
    }

    if let Some(base_url) = links {
        print_links(envelope, base_url, selections);
    }

    ExitCode::SUCCESS
}

/// Renders the hit page as a table.
fn print_hits(envelope: &ResultEnvelope) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Id", "Name", "Path", "Language", "Template", "Score"]);

    for hit in &envelope.hits {
        table.add_row([
            Cell::new(&hit.id),
            Cell::new(&hit.name),
            Cell::new(&hit.path),
            Cell::new(&hit.language),
            Cell::new(&hit.template),
            Cell::new(format!("{:.3}", hit.score)),
        ]);
    }

    println!("{table}");
}

/// Prints one navigation link per facet value not already selected.
fn print_links(envelope: &ResultEnvelope, base_url: &str, selections: &[FacetSelection]) {
    let mut printed_header = false;

    for (field, counts) in &envelope.facets {
        for count in counts {
            let already_selected = selections
                .iter()
                .any(|s| s.field == *field && s.value == count.value);
            if already_selected {
                continue;
            }

            if !printed_header {
                println!();
                println!("Refine:");
                printed_header = true;
            }

            let mut narrowed = selections.to_vec();
            narrowed.push(FacetSelection {
                field: field.clone(),
                value: count.value.clone(),
            });
            println!("   {}", facet::encode(base_url, &narrowed));
        }
    }
}
