//! Command-line interface.

mod config;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use config::{ConfigCommand, run_config_command};

#[derive(Parser, Debug)]
#[command(name = "courier", version, about = "Email assistant with context-isolated sub-agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process the latest email and draft a reply
    Run(RunArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Instruction for the coordinator (defaults to processing the latest email)
    #[arg(short, long)]
    pub instruction: Option<String>,

    /// Include file contents in the report
    #[arg(long)]
    pub show_files: bool,

    /// Write the JSON export to this path
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Use the built-in scripted model instead of a live one
    #[arg(long)]
    pub offline: bool,

    /// Model name for the OpenAI-compatible backend
    #[arg(long, env = "COURIER_MODEL")]
    pub model: Option<String>,

    /// Model turns allowed per agent run
    #[arg(long)]
    pub max_iterations: Option<usize>,
}
