//! Clap argument definitions for the `sift` CLI.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Faceted search over a local full-text index")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `sift index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// JSON corpus file (an array of items)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Directory to write the index into
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Stemmer language (overrides sift.toml)
    #[arg(long)]
    pub language: Option<String>,

    /// Delete existing documents before indexing
    #[arg(long)]
    pub replace: bool,
}

/// Arguments for `sift search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query terms; multiple terms are OR'd together
    pub terms: Vec<String>,

    /// Index directory
    #[arg(short = 'd', long)]
    pub index: PathBuf,

    /// Field the query terms match against
    #[arg(long, default_value = "body")]
    pub field: String,

    /// Non-ranking equality filter (repeatable)
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Field to compute facet counts for (repeatable)
    #[arg(long = "facet", value_name = "FIELD")]
    pub facets: Vec<String>,

    /// Facet selection as a query-string pair (repeatable)
    #[arg(long = "select", value_name = "facetFIELD=VALUE")]
    pub selections: Vec<String>,

    /// Regex query predicate (repeatable)
    #[arg(long = "regex", value_name = "FIELD=PATTERN")]
    pub regexes: Vec<String>,

    /// Fuzzy query predicate; threshold defaults to 0.5 (repeatable)
    #[arg(long = "fuzzy", value_name = "FIELD=VALUE[:THRESHOLD]")]
    pub fuzzies: Vec<String>,

    /// Set-membership query predicate (repeatable)
    #[arg(long = "in-set", value_name = "FIELD=VALUE")]
    pub in_sets: Vec<String>,

    /// Zero-based page index
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Page size (overrides sift.toml)
    #[arg(long)]
    pub page_size: Option<NonZeroUsize>,

    /// Return every hit instead of a page
    #[arg(long)]
    pub all: bool,

    /// Base URL for facet navigation links
    #[arg(long, value_name = "URL")]
    pub links: Option<String>,

    /// Output the result envelope as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift status`.
#[derive(Args, Debug, Clone)]
pub struct StatusCommand {
    /// Index directory
    #[arg(short = 'd', long)]
    pub index: PathBuf,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build or update an index from a JSON corpus
    Index(IndexCommand),

    /// Search the index with queries, filters, and facets
    #[command(after_help = "\
PREDICATES:
  TERM                    Term must appear in --field (ranking query)
  --filter field=value    Exact match that narrows results without ranking
  --regex field=pattern   Regular expression over indexed terms
  --fuzzy field=value:t   Edit-distance match; t in [0,1], 1.0 means exact
  --in-set field=value    Membership in a set-valued field

FACETS:
  --facet field               Count values of a field over the match set
  --select facetfield=value   Narrow to a facet value (same shape FACET
                              navigation links use)

EXAMPLES:
  sift search media -d ./idx
  sift search media fda -d ./idx --facet language --page-size 10
  sift search media -d ./idx --filter language=en
  sift search -d ./idx --regex name=med.*
  sift search -d ./idx --fuzzy name=zephyr:0.5
  sift search media -d ./idx --facet language --links /search?q=media")]
    Search(SearchCommand),

    /// Show index statistics
    Status(StatusCommand),
}
