//! Symbol tables and reference resolution for COBOL programs.
//!
//! The crate keeps one [`SymbolTable`] per program, keyed by
//! `programName%documentUri`, inside a concurrent [`SymbolService`]:
//!
//! - **Code-block binder**: paragraph and section definitions, usage binding
//!   with the same-section tie-break and `OF <section>` qualifiers
//! - **Variable binder**: local declarations first, then the GLOBAL items of
//!   the enclosing programs (nearest wins)
//! - **Query surface**: definitions/usages of the element under a position,
//!   with injected documents filtered out
//! - **Registration pass**: drives the binders over a whole tree
//!
//! Tables are discarded per document with [`SymbolService::reset`] before the
//! document is analysed again.
pub mod code_block;
pub mod matcher;
pub mod options;
pub mod pass;
pub mod service;
mod service_code_blocks;
mod service_queries;
mod service_variables;
pub mod symbol_table;

pub use code_block::CodeBlockReference;
pub use matcher::{QualifiedNameMatcher, VariableMatcher, qualifier_groups};
pub use options::SymbolOptions;
pub use pass::RegistrationPass;
pub use service::{SharedSymbolTable, SymbolService, read_table, write_table};
pub use service_queries::Element;
pub use symbol_table::{
    Declarations, FxIndexMap, ProgramKey, SymbolTable, SymbolTableSnapshot, VariableMap,
    normalize_name,
};

#[cfg(test)]
#[path = "../tests/symbol_table_tests.rs"]
mod symbol_table_tests;
