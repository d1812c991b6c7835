//! Symbol engine configuration.

use cobol_common::ErrorSeverity;
use cobol_common::implicit::{DEFAULT_IMPLICIT_PREFIX, is_implicit_uri};
use serde::Deserialize;

/// Configuration options for the symbol service and registration pass.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SymbolOptions {
    /// URI prefixes of injected, non-authored documents. Locations under
    /// these prefixes are dropped from query results.
    pub implicit_uri_prefixes: Vec<String>,
    /// Report variable usages that resolve to nothing.
    pub report_undefined_variables: bool,
    pub undefined_variable_severity: ErrorSeverity,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        SymbolOptions {
            implicit_uri_prefixes: vec![DEFAULT_IMPLICIT_PREFIX.to_string()],
            report_undefined_variables: true,
            undefined_variable_severity: ErrorSeverity::Error,
        }
    }
}

impl SymbolOptions {
    pub fn is_implicit(&self, uri: &str) -> bool {
        is_implicit_uri(uri, &self.implicit_uri_prefixes)
    }
}
