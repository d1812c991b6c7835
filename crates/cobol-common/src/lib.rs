//! Common types and utilities for the COBOL symbol engine.
//!
//! This crate provides foundational types used across all crates:
//! - Position/Range/Location types and node `Locality`
//! - Semantic diagnostic values and message templates
//! - Copybook names
//! - Implicit-code URI recognition
//! - Tree walk limits

// Position/Range types for line/column source locations
pub mod position;
pub use position::{Locality, Location, Position, Range};

// Diagnostic values produced by semantic analysis
pub mod diagnostics;
pub use diagnostics::{
    ErrorSeverity, ErrorSource, MessageTemplate, SemanticError, SemanticErrorKind,
};

pub mod copybook;
pub use copybook::CopybookName;

pub mod implicit;

// Centralized limits
pub mod limits;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
