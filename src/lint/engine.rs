//! Validation engine for running checks against a plugin.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::component::ComponentSet;
use crate::core::manifest::ManifestSource;
use crate::core::tokens::TokenCounter;

use super::config::{ValidationConfig, ValidationContext};
use super::diagnostic::{CheckKind, Issue, Severity};
use super::rule::BoxedCheck;
use super::rules::all_checks;

/// Issues recorded by one check run
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub issues: Vec<Issue>,
    /// No `must` issue recorded
    pub passed: bool,
    /// A budget reached its critical status
    #[serde(skip)]
    pub critical: bool,
    #[serde(skip)]
    verbose: bool,
}

impl CheckResult {
    #[must_use]
    pub const fn new(check: CheckKind, verbose: bool) -> Self {
        Self {
            check,
            issues: Vec::new(),
            passed: true,
            critical: false,
            verbose,
        }
    }

    /// Record an issue. `ok` issues are dropped unless verbose.
    pub fn push(&mut self, mut issue: Issue) {
        if issue.severity == Severity::Ok && !self.verbose {
            return;
        }
        issue.check = self.check;
        if issue.severity == Severity::Must {
            self.passed = false;
        }
        self.issues.push(issue);
    }

    pub const fn mark_critical(&mut self) {
        self.critical = true;
    }

    pub fn of_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.of_severity(severity).count()
    }
}

/// Outcome of a run, derived from the accumulated results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub must: usize,
    pub should: usize,
    pub may: usize,
    pub passed: bool,
    pub critical: bool,
}

impl Verdict {
    #[must_use]
    pub fn from_results(results: &[CheckResult]) -> Self {
        let sum = |severity| results.iter().map(|r| r.count(severity)).sum::<usize>();
        let must = sum(Severity::Must);
        Self {
            must,
            should: sum(Severity::Should),
            may: sum(Severity::May),
            passed: must == 0,
            critical: results.iter().any(|r| r.critical),
        }
    }

    /// 2 on a critical budget, else 1 on any `must`, else 0.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.critical {
            2
        } else if self.passed {
            0
        } else {
            1
        }
    }
}

/// Results of every selected check, in execution order
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub results: Vec<CheckResult>,
}

impl Report {
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_results(&self.results)
    }

    /// All issues of one severity across checks.
    pub fn issues(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.results
            .iter()
            .flat_map(move |r| r.of_severity(severity))
    }

    #[must_use]
    pub fn result(&self, check: CheckKind) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }
}

/// The validation engine that manages and runs checks
pub struct ValidationEngine {
    checks: Vec<BoxedCheck>,
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine with no checks registered
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            checks: Vec::new(),
            config,
        }
    }

    /// Create an engine with all five checks registered
    #[must_use]
    pub fn with_defaults(config: ValidationConfig) -> Self {
        let mut engine = Self::new(config);
        for check in all_checks() {
            engine.register(check);
        }
        engine
    }

    /// Register a check; checks always run in `CheckKind` order.
    pub fn register(&mut self, check: BoxedCheck) {
        let at = self
            .checks
            .iter()
            .position(|c| c.kind() > check.kind())
            .unwrap_or(self.checks.len());
        self.checks.insert(at, check);
    }

    #[must_use]
    pub fn with_check(mut self, check: BoxedCheck) -> Self {
        self.register(check);
        self
    }

    /// Keep only the checks named in `kinds`.
    #[must_use]
    pub fn select(mut self, kinds: &[CheckKind]) -> Self {
        self.checks.retain(|c| kinds.contains(&c.kind()));
        self
    }

    #[must_use]
    pub fn checks(&self) -> &[BoxedCheck] {
        &self.checks
    }

    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Discover the plugin under `root` and run every registered check.
    #[must_use]
    pub fn validate(&self, root: &Path, counter: &dyn TokenCounter) -> Report {
        let components = ComponentSet::discover(root);
        let manifest = ManifestSource::load(root);
        let ctx = ValidationContext::new(root, &components, &manifest, &self.config, counter);
        self.validate_with_context(&ctx)
    }

    /// Run every registered check against prepared inputs.
    #[must_use]
    pub fn validate_with_context(&self, ctx: &ValidationContext<'_>) -> Report {
        let mut report = Report::default();

        for check in &self.checks {
            debug!(check = check.name(), "check started");
            let result = check.run(ctx);
            info!(
                check = check.name(),
                must = result.count(Severity::Must),
                should = result.count(Severity::Should),
                may = result.count(Severity::May),
                "check finished"
            );
            report.results.push(result);
        }

        report
    }

    /// List all registered checks
    #[must_use]
    pub fn list_checks(&self) -> Vec<CheckInfo> {
        self.checks
            .iter()
            .map(|c| CheckInfo {
                kind: c.kind(),
                description: c.description().to_string(),
            })
            .collect()
    }
}

/// Information about a registered check
#[derive(Debug, Clone, Serialize)]
pub struct CheckInfo {
    pub kind: CheckKind,
    pub description: String,
}
