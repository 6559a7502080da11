//! Command-line interface for wboard.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wboard - proxy account and node administration panel
#[derive(Parser)]
#[command(name = "wboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web panel (default)
    #[command(alias = "daemon")]
    Serve,

    /// Write a config file with a freshly generated secret key and admin password
    Init {
        /// Where to write the file (defaults to ./config.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the stored hash form of a password
    HashPassword {
        password: String,
    },
}
