//! CLI commands and argument parsing

use crate::types::{ListKind, NamespaceId};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginated MediaWiki listing CLI
#[derive(Parser, Debug)]
#[command(name = "mw-listing")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL (e.g. https://en.wikipedia.org/w/)
    #[arg(short, long, global = true)]
    pub api: Option<String>,

    /// Client configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Iterate a listing and print every item
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Stop after this many items
        #[arg(long)]
        max: Option<usize>,
    },

    /// Print the first-page request URL without sending it
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },
}

/// Arguments describing one listing
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Category name or page title, without the "Category:" prefix
    #[arg(short, long)]
    pub subject: String,

    /// Listing kind (categorymembers, backlinks, embeddedin)
    #[arg(short, long, default_value = "categorymembers")]
    pub kind: ListKind,

    /// Namespace filter (comma-separated ids, empty = all)
    #[arg(long = "ns", value_delimiter = ',', allow_hyphen_values = true)]
    pub namespaces: Vec<NamespaceId>,

    /// Page size (defaults to the configured default_limit)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One title per line
    Text,
    /// One JSON record per line
    Json,
    /// Pretty-printed JSON records
    Pretty,
}
