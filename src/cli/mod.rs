//! CLI module for fishdoc
//!
//! Provides command-line interface for:
//! - init: Create the data directory layout
//! - import / open / remove: Manage the active document
//! - status / list: Report reveal progress
//! - rate / title: Change settings
//! - type: Serve input events from stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    import, init, list, open, rate, remove, run, run_command, serve_events, set_title, status,
    type_events,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
