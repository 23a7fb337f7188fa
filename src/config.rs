use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::tokens::TokenizerMethod;
use crate::error::{PlintError, Result};

/// Project-level config file name, looked up in the plugin root.
pub const PROJECT_CONFIG_FILE: &str = ".plint.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, plugin_root: &Path) -> Result<Self> {
        Self::load_with_env(explicit_path, plugin_root, |key| std::env::var(key).ok())
    }

    /// Load with `env` answering `PLINT_*` lookups.
    fn load_with_env(
        explicit_path: Option<&Path>,
        plugin_root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("PLINT_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(PlintError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(plugin_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(&env)?;
        config.budget.check_order()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            debug!("no user config directory; skipping global config");
            return Ok(None);
        };
        Self::load_patch(&dir.join("plint/config.toml"))
    }

    fn load_project(plugin_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&plugin_root.join(PROJECT_CONFIG_FILE))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| PlintError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PlintError::Config(format!("parse config {}: {err}", path.display())))?;
        debug!(path = %path.display(), "config layer loaded");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.budget {
            self.budget.merge(patch);
        }
        if let Some(patch) = patch.tokenizer {
            self.tokenizer.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<()> {
        let budget = [
            ("PLINT_BUDGET_METADATA_TARGET", &mut self.budget.metadata_target),
            ("PLINT_BUDGET_METADATA_WARNING", &mut self.budget.metadata_warning),
            ("PLINT_BUDGET_BODY_TARGET", &mut self.budget.body_target),
            ("PLINT_BUDGET_BODY_WARNING", &mut self.budget.body_warning),
            ("PLINT_BUDGET_BODY_CRITICAL", &mut self.budget.body_critical),
        ];
        for (key, slot) in budget {
            if let Some(value) = env_usize(env, key)? {
                *slot = value;
            }
        }
        if let Some(value) = env("PLINT_TOKENIZER") {
            self.tokenizer.method = value.parse()?;
        }
        Ok(())
    }
}

/// Unit thresholds for skill metadata and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub metadata_target: usize,
    pub metadata_warning: usize,
    pub body_target: usize,
    pub body_warning: usize,
    pub body_critical: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            metadata_target: 50,
            metadata_warning: 100,
            body_target: 500,
            body_warning: 800,
            body_critical: 2500,
        }
    }
}

impl BudgetConfig {
    fn merge(&mut self, patch: BudgetPatch) {
        if let Some(value) = patch.metadata_target {
            self.metadata_target = value;
        }
        if let Some(value) = patch.metadata_warning {
            self.metadata_warning = value;
        }
        if let Some(value) = patch.body_target {
            self.body_target = value;
        }
        if let Some(value) = patch.body_warning {
            self.body_warning = value;
        }
        if let Some(value) = patch.body_critical {
            self.body_critical = value;
        }
    }

    /// Thresholds must not decrease from target to critical.
    fn check_order(&self) -> Result<()> {
        if self.metadata_target > self.metadata_warning {
            return Err(PlintError::Config(format!(
                "budget.metadata_target ({}) exceeds budget.metadata_warning ({})",
                self.metadata_target, self.metadata_warning
            )));
        }
        if self.body_target > self.body_warning || self.body_warning > self.body_critical {
            return Err(PlintError::Config(format!(
                "budget body thresholds out of order: target {} / warning {} / critical {}",
                self.body_target, self.body_warning, self.body_critical
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub method: TokenizerMethod,
}

impl TokenizerConfig {
    fn merge(&mut self, patch: TokenizerPatch) {
        if let Some(method) = patch.method {
            self.method = method;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub budget: Option<BudgetPatch>,
    pub tokenizer: Option<TokenizerPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BudgetPatch {
    pub metadata_target: Option<usize>,
    pub metadata_warning: Option<usize>,
    pub body_target: Option<usize>,
    pub body_warning: Option<usize>,
    pub body_critical: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenizerPatch {
    pub method: Option<TokenizerMethod>,
}

fn env_usize(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    env(key)
        .map(|value| {
            value.trim().parse::<usize>().map_err(|err| {
                PlintError::Config(format!("invalid {key} value {value}: {err}"))
            })
        })
        .transpose()
}
