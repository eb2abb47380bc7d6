//! Command-line interface for the complaint desk.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Complaint desk - student registration and complaint tracking
#[derive(Parser)]
#[command(name = "complaint-desk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server and the photo sweep scheduler (default)
    #[command(alias = "daemon")]
    Serve,

    /// Validate the configuration and check the database connection
    Check,

    /// Remove uploaded photos no student references
    #[command(alias = "sweep")]
    SweepPhotos,

    /// List registered students
    #[command(alias = "ls")]
    Students,

    /// List complaints, optionally for one student
    Complaints {
        /// Only show complaints filed under this email
        #[arg(long)]
        email: Option<String>,
    },

    /// Write a default config.toml if none exists
    Init,
}

impl Cli {
    /// Loads the config named by `--config`, or searches the default paths.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => Config::load(),
        }
    }
}

pub use commands::*;
