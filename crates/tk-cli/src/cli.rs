//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::edit::EditArgs;
use crate::commands::track::TrackArgs;

/// Work-session timer and stopwatch.
///
/// Track work with a countdown timer or a stopwatch, keep a log of finished
/// sessions, and see how much you have tracked today.
#[derive(Debug, Parser)]
#[command(name = "tk", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an interactive tracking session.
    Track(TrackArgs),

    /// List recorded entries.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record an entry manually.
    Add(AddArgs),

    /// Edit a recorded entry.
    Edit(EditArgs),

    /// Delete a recorded entry.
    Delete {
        /// Entry number as shown by `tk list`.
        number: usize,
    },

    /// Show time tracked today.
    Today {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show storage status.
    Status,
}
