//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function returning the process exit code

pub mod tokens;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub fn run(cli: &Cli) -> Result<u8> {
    match &cli.command {
        Commands::Validate(args) => validate::run(cli, args),
        Commands::Tokens(args) => tokens::run(cli, args),
    }
}
