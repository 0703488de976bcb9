//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod list;
mod show;
mod synth;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize stack templates to an output directory
    Synth {
        /// Only synthesize the named stack
        #[arg(long)]
        stack: Option<String>,

        /// Output directory for templates and the manifest
        #[arg(long, env = "STRATA_OUT", default_value = "out")]
        out: PathBuf,
    },
    /// List the declared stacks
    List,
    /// Show a stack's pipeline topology and grants
    Show {
        /// Stack name
        stack: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Synth { stack, out } => synth::handle_synth(stack.as_deref(), &out),
        Commands::List => list::handle_list(),
        Commands::Show { stack } => show::handle_show(&stack),
    }
}
