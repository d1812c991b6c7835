//! Command-line driver for the COBOL symbol engine.
//!
//! Reads a serialized syntax tree, runs the registration pass over it and
//! prints symbol tables, semantic errors or the element at a position.
pub mod args;
pub mod driver;
pub mod tracing_config;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
