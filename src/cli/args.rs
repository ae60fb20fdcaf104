// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Sync Pinboard bookmarks into SQLite and publish them as a static linklog
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Print a default config file and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch new bookmarks from Pinboard into the local store
    Sync {
        #[arg(short = 'n', long = "count", help = "page size for the fetch")]
        count: Option<usize>,

        #[arg(short = 't', long = "tag", help = "restrict the fetch to one tag")]
        tag: Option<String>,
    },
    /// Render the static site (index, archives, feed, recent JSON)
    Render,
    /// Reconcile via fields from a Pinboard export JSON file
    Backfill {
        /// Path to the export JSON file
        file: PathBuf,

        #[arg(
            long = "execute",
            help = "write the updates; without this flag only a preview is printed"
        )]
        execute: bool,
    },
}
