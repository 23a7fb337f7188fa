//! Error types for plint.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library and the CLI.
///
/// Individual checks never return these: a failure to read a single
/// component is reported as a `must` issue instead. Only run-level
/// preconditions (bad plugin path, bad config, unknown check) end up here.
#[derive(Debug, Error)]
pub enum PlintError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid plugin: {0}")]
    InvalidPlugin(String),

    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
}

impl PlintError {
    /// Short machine-readable code used in JSON error output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::Config(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
            Self::NotFound(_) => "not_found",
            Self::InvalidPlugin(_) => "invalid_plugin",
            Self::Read { .. } => "read_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlintError>;
