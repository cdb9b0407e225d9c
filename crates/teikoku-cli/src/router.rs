// Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Teikoku - stage files in memory and restore them on demand
#[derive(Parser, Debug)]
#[command(name = "teikoku")]
#[command(bin_name = "teikoku")]
#[command(about = "Stage files in memory and write them back on demand")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: <config dir>/teikoku/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load files into memory
    Stage {
        /// Files to stage, in selection order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Print details of the focused file
        #[arg(short, long)]
        details: bool,

        /// Reload the focused file from disk after staging
        #[arg(short, long)]
        reload: bool,

        /// Write the focused file's buffer back to disk
        #[arg(short, long)]
        write_back: bool,

        /// File to focus instead of the last one selected
        #[arg(long, value_name = "FILE")]
        focus: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}
