//! E2E test suite entry point.

mod fixture;
mod tokens_workflow;
mod validate_workflow;
