//! CLI subcommand implementations.

pub mod add;
pub mod edit;
pub mod list;
pub mod status;
pub mod today;
pub mod track;
pub mod util;
