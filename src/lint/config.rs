//! Validation configuration and per-run context.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::BudgetConfig;
use crate::core::component::ComponentSet;
use crate::core::manifest::ManifestSource;
use crate::core::tokens::TokenCounter;

/// Settings shared by every check. Built once per run, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Emit `ok` issues for rules that pass
    #[serde(default)]
    pub verbose: bool,
}

impl ValidationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    #[must_use]
    pub const fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }
}

/// Read-only inputs handed to every check.
///
/// Components and manifest are read once before the first check runs.
pub struct ValidationContext<'a> {
    /// Plugin root directory
    pub root: &'a Path,

    pub components: &'a ComponentSet,

    pub manifest: &'a ManifestSource,

    pub config: &'a ValidationConfig,

    pub counter: &'a dyn TokenCounter,
}

impl<'a> ValidationContext<'a> {
    #[must_use]
    pub fn new(
        root: &'a Path,
        components: &'a ComponentSet,
        manifest: &'a ManifestSource,
        config: &'a ValidationConfig,
        counter: &'a dyn TokenCounter,
    ) -> Self {
        Self {
            root,
            components,
            manifest,
            config,
            counter,
        }
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.config.verbose
    }
}
