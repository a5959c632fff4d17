//! tk CLI library.
//!
//! This crate provides the CLI interface for the tk work-session tracker.

mod cli;
pub mod commands;
mod config;
mod notifier;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use notifier::TerminalNotifier;
