//! Copybook names with dialect context.

use serde::{Deserialize, Serialize};

const COBOL: &str = "COBOL";

/// The name of a copybook as written in a COPY statement.
///
/// The dialect type says which dialect the COPY statement belongs to; plain
/// COBOL copybooks leave it unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopybookName {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect_type: Option<String>,
}

impl CopybookName {
    pub fn new(display_name: impl Into<String>) -> Self {
        CopybookName {
            display_name: display_name.into(),
            dialect_type: None,
        }
    }

    pub fn with_dialect(display_name: impl Into<String>, dialect_type: impl Into<String>) -> Self {
        CopybookName {
            display_name: display_name.into(),
            dialect_type: Some(dialect_type.into()),
        }
    }

    /// The dialect this copybook belongs to, `COBOL` when none was given.
    pub fn dialect_type(&self) -> &str {
        self.dialect_type.as_deref().unwrap_or(COBOL)
    }

    pub fn qualified_name(&self) -> &str {
        &self.display_name
    }
}
