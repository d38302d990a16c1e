//! CLI commands and argument parsing

use crate::pagination::StrategyKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated collection envelopes with navigation links
#[derive(Parser, Debug)]
#[command(name = "collection-links")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Service definition file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Render one collection page for a URL and print it as JSON
    Links {
        /// Absolute request URL, including its query string
        #[arg(long)]
        url: String,

        /// Link strategy
        #[arg(short, long, value_enum, default_value = "offset")]
        strategy: StrategyKind,

        /// Total number of items (defaults to the number of loaded items)
        #[arg(long)]
        count: Option<u64>,

        /// JSON array file with the items
        #[arg(long)]
        items: Option<PathBuf>,

        /// Item field holding the timestamp (required for cursor strategies)
        #[arg(long)]
        date_field: Option<String>,

        /// Print only the links instead of the whole envelope
        #[arg(long)]
        links_only: bool,
    },

    /// List the available link strategies
    Strategies,
}
