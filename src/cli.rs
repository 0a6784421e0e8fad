//! Command-line interface for spoofcheck.
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Audio anti-spoofing: classify clips as genuine or spoofed and report the batch EER
#[derive(Parser, Debug)]
#[command(name = "spoofcheck", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to settings file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and serve the HTTP API
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Override `server.port`
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Score local files as one batch and print the JSON result
    Score {
        /// Audio files (.wav / .flac)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Send local files as one batch to a running server
    Submit {
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,

        /// Audio files (.wav / .flac)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Write the default settings file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
