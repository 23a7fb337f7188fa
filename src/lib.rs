//! plint - Validate Claude Code plugin packages before activation.
//!
//! Checks a plugin directory (manifest, commands, agents, skills) against
//! layout, header and budget rules and maps the findings to an exit code.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lint;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use error::{PlintError, Result};
