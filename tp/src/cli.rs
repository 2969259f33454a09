//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TubePilot - conversational playlist assistant
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Turns chat prompts into video-platform playlist actions",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// User id recorded in the action log
    #[arg(short, long, global = true, default_value = "local")]
    pub user: String,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Handle a single prompt and print the response as JSON
    Chat {
        /// The free-text request, e.g. "make a playlist of 80s rock"
        prompt: String,
    },

    /// Start an interactive chat session
    Repl,
}
