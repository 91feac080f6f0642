//! CLI argument definitions using clap
//!
//! Commands:
//! - fishdoc init --config <path>
//! - fishdoc import <file> [--title <title>] --config <path>
//! - fishdoc open <id> --config <path>
//! - fishdoc status --config <path>
//! - fishdoc list --config <path>
//! - fishdoc rate <n> --config <path>
//! - fishdoc title <text> --config <path>
//! - fishdoc remove --config <path>
//! - fishdoc type --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fishdoc - reveal a stored document a few characters per keystroke
#[derive(Parser, Debug)]
#[command(name = "fishdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new fishdoc data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,
    },

    /// Import a plain-text file and make it the active document
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,

        /// UTF-8 text file to import
        file: PathBuf,

        /// Title for the document
        #[arg(long)]
        title: Option<String>,
    },

    /// Make a stored document active
    Open {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,

        /// Document identifier (40 hex characters)
        id: String,
    },

    /// Show the active document and reveal progress
    Status {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,
    },

    /// List every known document
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,
    },

    /// Set how many characters each keystroke reveals
    Rate {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,

        /// Characters per keystroke (clamped to 1..=1000)
        chars_per_keystroke: usize,
    },

    /// Set the active document's title
    Title {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,

        /// New title; blank resets to the default
        title: String,
    },

    /// Remove the active document from both stores
    Remove {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,
    },

    /// Read input events from stdin and write one frame per line
    Type {
        /// Path to configuration file
        #[arg(long, default_value = "./fishdoc.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
