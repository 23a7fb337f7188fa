use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::core::tokens::{TokenCounter, select_counter};
use crate::error::{PlintError, Result};
use crate::lint::ValidationConfig;

/// Per-process state shared by every subcommand.
pub struct AppContext {
    /// Plugin or skill path named on the command line
    pub target: PathBuf,
    pub config: Config,
    pub validation: ValidationConfig,
    pub counter: Box<dyn TokenCounter>,
    pub json: bool,
    pub verbosity: u8,
}

impl AppContext {
    /// Load configuration relative to `target` and select the token counter.
    pub fn from_cli(cli: &crate::cli::Cli, target: &Path) -> Result<Self> {
        let config_root = config_root(target);
        let config = Config::load(cli.config.as_deref(), &config_root)?;
        debug!(root = %config_root.display(), "configuration loaded");

        let mut validation = ValidationConfig::new().with_budget(config.budget);
        if cli.verbose > 0 {
            validation = validation.verbose();
        }
        let counter = select_counter(config.tokenizer.method);

        Ok(Self {
            target: target.to_path_buf(),
            config,
            validation,
            counter,
            json: cli.json,
            verbosity: cli.verbose,
        })
    }

    #[must_use]
    pub fn token_method(&self) -> &'static str {
        self.counter.method()
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbosity > 0
    }
}

/// Directory searched for the project config file.
fn config_root(target: &Path) -> PathBuf {
    if target.is_file() {
        target.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        target.to_path_buf()
    }
}

/// Fail unless `path` is an existing directory.
pub fn require_dir(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(PlintError::NotFound(format!(
            "{what} not found: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(PlintError::InvalidPlugin(format!(
            "Path is not a directory: {}",
            path.display()
        )));
    }
    Ok(())
}
