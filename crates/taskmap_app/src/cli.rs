use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskmap_core::{AggregationPolicy, FilterMode};
use taskmap_engine::{DEFAULT_INDEX, DEFAULT_PORT};

#[derive(Debug, Parser)]
#[command(name = "taskmap", version, about = "Task checkboxes for mind-map documents")]
pub struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve a directory of demo pages over HTTP.
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Page served for `/`.
        #[arg(long, default_value = DEFAULT_INDEX)]
        index: String,
    },
    /// Print a document with task prefixes, optionally filtered.
    Show {
        document: PathBuf,
        /// all, uncompleted or completed
        #[arg(long)]
        filter: Option<FilterMode>,
        /// leaf_weighted or mean_of_children
        #[arg(long)]
        policy: Option<AggregationPolicy>,
    },
    /// Toggle one node and save the document.
    Toggle {
        document: PathBuf,
        id: String,
        #[arg(long)]
        policy: Option<AggregationPolicy>,
    },
    /// Interactive session reading commands from stdin.
    Session {
        document: PathBuf,
        #[arg(long)]
        policy: Option<AggregationPolicy>,
    },
    /// Print the effective theme as JSON.
    Theme {
        /// JSON file with overrides on top of the modern theme.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
