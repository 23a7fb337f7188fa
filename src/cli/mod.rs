//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

use commands::tokens::TokensArgs;
use commands::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(name = "plint", version, about = "Validate Claude Code plugin packages before activation")]
pub struct Cli {
    /// Increase verbosity and report passing rules
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file replacing the global and project config files
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a plugin directory
    Validate(ValidateArgs),

    /// Report the token budget of a skill or of every skill in a plugin
    Tokens(TokensArgs),
}
