//! Implementation of `sift search`.

use std::process::ExitCode;

use sift_index::{ClientOptions, IndexClient, IndexProvider, search_schema};
use sift_query::{
    FacetSelection, Predicate, PredicateGroup, Query, QueryBuilder,
    facet::{self, FACET_PREFIX},
};

use crate::{cli::args::SearchCommand, cli::output, config::Config};

/// Default similarity threshold when `--fuzzy` gives none.
const DEFAULT_FUZZY_THRESHOLD: f32 = 0.5;

/// Builds a query from the CLI flags and executes it against the index.
pub fn run(config: &Config, cmd: &SearchCommand) -> ExitCode {
    let (query, selections) = match build_query(config, cmd) {
        Ok(built) => built,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

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

    match client.execute(&query) {
        Ok(envelope) => {
            output::output_envelope(&envelope, cmd.json, cmd.links.as_deref(), &selections)
        }
        Err(e) => {
            eprintln!("error: search failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Translates the CLI flags into a validated query plus its selections.
fn build_query(
    config: &Config,
    cmd: &SearchCommand,
) -> Result<(Query, Vec<FacetSelection>), String> {
    let mut builder = QueryBuilder::new(search_schema());

    if !cmd.terms.is_empty() {
        let terms: Vec<PredicateGroup> = cmd
            .terms
            .iter()
            .map(|term| Predicate::contains(&cmd.field, term).into())
            .collect();
        builder = builder.with_query(PredicateGroup::any(terms));
    }

    for raw in &cmd.filters {
        let (field, value) = split_pair(raw)?;
        builder = builder.with_filter(Predicate::equals(field, value));
    }

    for raw in &cmd.regexes {
        let (field, pattern) = split_pair(raw)?;
        builder = builder.with_query(Predicate::matches(field, pattern));
    }

    for raw in &cmd.fuzzies {
        let (field, rest) = split_pair(raw)?;
        let (value, threshold) = split_threshold(rest);
        builder = builder.with_query(Predicate::fuzzy_like(field, value, threshold));
    }

    for raw in &cmd.in_sets {
        let (field, value) = split_pair(raw)?;
        builder = builder.with_query(Predicate::in_set(field, value));
    }

    for field in &cmd.facets {
        builder = builder.facet_on(field);
    }

    let mut pairs = Vec::with_capacity(cmd.selections.len());
    for raw in &cmd.selections {
        let (key, value) = split_pair(raw)?;
        if !key.starts_with(FACET_PREFIX) || key == FACET_PREFIX {
            return Err(format!(
                "facet selection key `{key}` must be `{FACET_PREFIX}<field>`"
            ));
        }
        pairs.push((key, value));
    }
    let selections = facet::decode(pairs);
    for selection in &selections {
        builder = builder.with_facet_selection(&selection.field, &selection.value);
    }

    if !cmd.all {
        let size = cmd.page_size.unwrap_or(config.page_size);
        builder = builder.page(cmd.page, size);
    }

    let query = builder.build().map_err(|e| e.to_string())?;
    Ok((query, selections))
}

/// Splits a `FIELD=VALUE` argument into its halves.
fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    raw.split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))
}

/// Splits an optional `:THRESHOLD` suffix off a fuzzy operand.
///
/// A suffix that does not parse as a number is treated as part of the
/// value, so `name=a:b` matches the literal `a:b`.
fn split_threshold(raw: &str) -> (&str, f32) {
    match raw.rsplit_once(':') {
        Some((value, suffix)) => match suffix.parse::<f32>() {
            Ok(threshold) => (value, threshold),
            Err(_) => (raw, DEFAULT_FUZZY_THRESHOLD),
        },
        None => (raw, DEFAULT_FUZZY_THRESHOLD),
    }
}
