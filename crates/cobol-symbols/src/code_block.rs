//! Definition/usage accumulator for one paragraph or section name.

use cobol_common::Location;
use serde::Serialize;

/// Definitions and usages recorded for one code-block name within one
/// program.
///
/// Both lists only grow. The whole reference goes away when the owning
/// program's symbol table is reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CodeBlockReference {
    definitions: Vec<Location>,
    usages: Vec<Location>,
}

impl CodeBlockReference {
    pub fn new() -> Self {
        CodeBlockReference::default()
    }

    pub fn add_definition(&mut self, location: Location) {
        self.definitions.push(location);
    }

    pub fn add_usage(&mut self, location: Location) {
        self.usages.push(location);
    }

    pub fn definitions(&self) -> &[Location] {
        &self.definitions
    }

    pub fn usages(&self) -> &[Location] {
        &self.usages
    }
}
