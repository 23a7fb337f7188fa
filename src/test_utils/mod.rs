//! Shared test utilities for plint.

pub mod fixtures;

use std::path::Path;

use crate::core::component::ComponentSet;
use crate::core::manifest::ManifestSource;
use crate::core::tokens::ApproxCounter;
use crate::lint::config::{ValidationConfig, ValidationContext};
use crate::lint::diagnostic::{Issue, Severity};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run table-driven tests with detailed logging.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: std::fmt::Debug,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    for case in cases {
        println!("[TEST] Running: {}", case.name);
        println!("[TEST] Input: {:?}", case.input);

        let actual = test_fn(case.input);

        if actual != case.expected {
            return Err(format!(
                "Test '{}' failed: expected {:?}, got {:?}",
                case.name, case.expected, actual
            ));
        }
        println!("[TEST] PASSED: {}\n", case.name);
    }
    Ok(())
}

/// Run one check against the plugin under `root` with approximate counting.
pub fn run_check(check: &dyn Check, root: &Path, config: &ValidationConfig) -> CheckResult {
    let components = ComponentSet::discover(root);
    let manifest = ManifestSource::load(root);
    let ctx = ValidationContext::new(root, &components, &manifest, config, &ApproxCounter);
    let result = check.run(&ctx);
    for issue in &result.issues {
        println!("[CHECK] {issue}");
    }
    result
}

/// Issues of `severity` whose message starts with `prefix`.
pub fn matching<'a>(result: &'a CheckResult, severity: Severity, prefix: &str) -> Vec<&'a Issue> {
    result
        .of_severity(severity)
        .filter(|i| i.message.starts_with(prefix))
        .collect()
}
