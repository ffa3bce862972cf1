//! Command line argument parsing
//!
//! Subcommands:
//! - `run`: start the orchestration system in the foreground
//! - `check-config`: validate a configuration file and print the result

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "aos")]
#[command(author = "Agent Orchestration System Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "A Rust-based multi-agent orchestration system that automates business operations"
)]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the system and process tasks until interrupted
    Run {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "aos.toml")]
        config: PathBuf,
        /// JSON file of task records to submit at startup
        #[arg(short = 't', long = "tasks")]
        tasks: Option<PathBuf>,
        /// Override the worker pool size
        #[arg(short = 'w', long = "workers")]
        workers: Option<usize>,
        /// Disable the periodic routine generator
        #[arg(long = "no-routines")]
        no_routines: bool,
    },
    /// Validate a configuration file
    CheckConfig {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "aos.toml")]
        config: PathBuf,
    },
}
