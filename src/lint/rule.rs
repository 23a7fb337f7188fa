//! Check trait.

use super::config::ValidationContext;
use super::diagnostic::CheckKind;
use super::engine::CheckResult;

/// One independent validation pass over a plugin.
///
/// Checks are stateless. Everything they need arrives through the
/// `ValidationContext`, and they never fail: problems reading individual
/// files are recorded as issues on the returned result.
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Human-readable description of what this check verifies
    fn description(&self) -> &str;

    fn run(&self, ctx: &ValidationContext<'_>) -> CheckResult;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// A boxed check for dynamic dispatch
pub type BoxedCheck = Box<dyn Check>;
