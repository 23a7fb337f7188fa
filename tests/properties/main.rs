//! Property test suite entry point.

mod budget_tests;
mod parser_tests;
