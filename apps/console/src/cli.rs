//! Command-line surface of `sapore`.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::commands::Command;

#[derive(Debug, Parser)]
#[command(name = "sapore", about = "Sant'Sapore back-office console", version)]
pub struct Cli {
    #[arg(long, global = true, env = "SAPORE_CONFIG", help = "Path to console.toml")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}
