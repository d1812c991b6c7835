//! Diagnostic values produced by semantic analysis.
//!
//! The symbol engine only *produces* these values. Rendering them into a
//! client message and transporting them is the job of the diagnostics layer,
//! which can use [`get_message_template`] and [`format_message`] to build a
//! single-line message from the [`MessageTemplate`] of an error.

use crate::position::Locality;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Classification
// =============================================================================

/// Which stage of analysis reported a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorSource {
    Parsing,
    Dialect,
    Copybook,
    Preprocessor,
}

impl ErrorSource {
    /// Display text used by clients for the diagnostic source column.
    pub const fn text(self) -> &'static str {
        match self {
            ErrorSource::Parsing => "COBOL Language Support - Parsing",
            ErrorSource::Dialect => "COBOL Language Support - Dialect",
            ErrorSource::Copybook => "COBOL Language Support - Copybook",
            ErrorSource::Preprocessor => "COBOL Language Support - Preprocessor",
        }
    }
}

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorSeverity {
    #[default]
    Error,
    Warning,
    Info,
    Hint,
}

// =============================================================================
// Message templates
// =============================================================================

pub mod message_keys {
    pub const PARAGRAPH_NOT_DEFINED: &str = "semantics.paragraphNotDefined";
    pub const AMBIGUOUS_REFERENCE: &str = "semantics.ambiguous";
    pub const VARIABLE_NOT_DEFINED: &str = "semantics.variableNotDefined";
}

/// Message templates keyed by message key. `{0}` is the referenced name.
pub static MESSAGE_TEMPLATES: &[(&str, &str)] = &[
    (
        message_keys::PARAGRAPH_NOT_DEFINED,
        "The following paragraph or section is not defined: {0}",
    ),
    (
        message_keys::AMBIGUOUS_REFERENCE,
        "Ambiguous reference: {0}",
    ),
    (
        message_keys::VARIABLE_NOT_DEFINED,
        "Variable {0} is not defined",
    ),
];

/// A message key together with its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub key: &'static str,
    pub args: Vec<String>,
}

impl MessageTemplate {
    pub fn of(key: &'static str, arg: impl Into<String>) -> Self {
        MessageTemplate {
            key,
            args: vec![arg.into()],
        }
    }

    /// Render using the built-in template table. Unknown keys render as the key.
    pub fn render(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        match get_message_template(self.key) {
            Some(template) => format_message(template, &args),
            None => self.key.to_string(),
        }
    }
}

/// Look up the template string for a message key.
#[must_use]
pub fn get_message_template(key: &str) -> Option<&'static str> {
    MESSAGE_TEMPLATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, template)| *template)
}

/// Format a message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Semantic errors
// =============================================================================

/// The kinds of problem the symbol engine can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticErrorKind {
    /// A code-block usage has no matching definition in its program.
    ParagraphNotDefined,
    /// A code-block usage matches more than one definition, even after
    /// narrowing by enclosing section.
    AmbiguousReference,
    /// A variable usage resolved to no declaration, locally or globally.
    VariableNotDefined,
}

impl SemanticErrorKind {
    pub const fn message_key(self) -> &'static str {
        match self {
            SemanticErrorKind::ParagraphNotDefined => message_keys::PARAGRAPH_NOT_DEFINED,
            SemanticErrorKind::AmbiguousReference => message_keys::AMBIGUOUS_REFERENCE,
            SemanticErrorKind::VariableNotDefined => message_keys::VARIABLE_NOT_DEFINED,
        }
    }
}

/// A structured semantic error, ready for the diagnostics sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// The name that was referenced.
    pub name: String,
    pub source: ErrorSource,
    pub severity: ErrorSeverity,
    pub locality: Locality,
}

impl SemanticError {
    /// Create a new parsing-stage error.
    #[must_use]
    pub fn error(kind: SemanticErrorKind, name: impl Into<String>, locality: Locality) -> Self {
        SemanticError {
            kind,
            name: name.into(),
            source: ErrorSource::Parsing,
            severity: ErrorSeverity::Error,
            locality,
        }
    }

    #[must_use]
    pub const fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub const fn with_source(mut self, source: ErrorSource) -> Self {
        self.source = source;
        self
    }

    pub fn message_template(&self) -> MessageTemplate {
        MessageTemplate::of(self.kind.message_key(), self.name.clone())
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.locality.to_location(),
            self.message_template().render()
        )
    }
}
