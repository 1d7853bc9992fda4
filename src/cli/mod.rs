//! CLI module
//!
//! Command-line interface for running listings.
//!
//! # Commands
//!
//! - `list` - Iterate a listing and print every item
//! - `url` - Print the first-page request URL without sending it

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
