//! Plugin validation framework.
//!
//! - `Check` trait for one independent validation pass
//! - `ValidationEngine` for running checks in their fixed order
//! - `Issue` and `Severity` for reporting findings
//! - `Verdict` for mapping a run to pass/fail and an exit code
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use plint::core::tokens::ApproxCounter;
//! use plint::lint::{ValidationConfig, ValidationEngine};
//!
//! let engine = ValidationEngine::with_defaults(ValidationConfig::new());
//! let report = engine.validate(Path::new("./my-plugin"), &ApproxCounter);
//! std::process::exit(i32::from(report.verdict().exit_code()));
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod rule;
pub mod rules;

pub use config::{ValidationConfig, ValidationContext};
pub use diagnostic::{CheckKind, Issue, Severity};
pub use engine::{CheckInfo, CheckResult, Report, ValidationEngine, Verdict};
pub use rule::{BoxedCheck, Check};

pub use rules::all_checks;
