//! Symbol service: owner of every per-program symbol table.
//!
//! The service is shared by the whole server. The program-key map is a
//! `DashMap`, so registration for one document, queries against another and
//! resets can run on different threads without callers locking anything.
//!
//! Each table sits behind its own `RwLock` inside an `Arc`. Mutation of one
//! table comes only from the single traversal pass (re)analysing its
//! document; queries clone the `Arc` and keep reading their snapshot even if
//! a reset removes the entry meanwhile.
//!
//! The binder operations live in sibling modules:
//! - `service_code_blocks`: paragraph/section registration and usage binding
//! - `service_variables`: variable registration and local/global resolution
//! - `service_queries`: position-based element lookup

use crate::code_block::CodeBlockReference;
use crate::matcher::{QualifiedNameMatcher, VariableMatcher};
use crate::options::SymbolOptions;
use crate::symbol_table::{FxIndexMap, ProgramKey, SymbolTable, VariableMap};
use cobol_tree::{NodeArena, NodeIndex};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// A symbol table shared between the registration pass and queries.
pub type SharedSymbolTable = Arc<RwLock<SymbolTable>>;

/// Thread-safe facade over all per-program symbol tables.
pub struct SymbolService {
    program_symbols: DashMap<ProgramKey, SharedSymbolTable>,
    pub(crate) matcher: Box<dyn VariableMatcher>,
    pub(crate) options: SymbolOptions,
}

impl Default for SymbolService {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolService {
    pub fn new() -> Self {
        Self::with_options(SymbolOptions::default())
    }

    pub fn with_options(options: SymbolOptions) -> Self {
        Self::with_matcher(options, Box::new(QualifiedNameMatcher))
    }

    /// Use a custom qualifier-chain matcher for variable resolution.
    pub fn with_matcher(options: SymbolOptions, matcher: Box<dyn VariableMatcher>) -> Self {
        SymbolService {
            program_symbols: DashMap::new(),
            matcher,
            options,
        }
    }

    pub fn options(&self) -> &SymbolOptions {
        &self.options
    }

    // =========================================================================
    // Table access
    // =========================================================================

    /// Key of the program node at `program`.
    pub fn program_key(&self, arena: &NodeArena, program: NodeIndex) -> ProgramKey {
        ProgramKey::of(arena, program)
    }

    /// Table for `key`, created on first access. Every call for the same key
    /// returns the same table until the key is reset.
    pub fn table(&self, key: ProgramKey) -> SharedSymbolTable {
        if let Some(existing) = self.program_symbols.get(&key) {
            return Arc::clone(existing.value());
        }
        let entry = self.program_symbols.entry(key).or_insert_with(|| {
            trace!("SymbolService::table - creating symbol table");
            Arc::default()
        });
        Arc::clone(entry.value())
    }

    /// Table for the program node, created on first access.
    pub fn program_table(&self, arena: &NodeArena, program: NodeIndex) -> SharedSymbolTable {
        self.table(ProgramKey::of(arena, program))
    }

    /// Table for `key` if one exists. Query paths use this so that lookups
    /// never resurrect a reset program.
    pub fn existing_table(&self, key: &ProgramKey) -> Option<SharedSymbolTable> {
        self.program_symbols
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn existing_program_table(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
    ) -> Option<SharedSymbolTable> {
        self.existing_table(&ProgramKey::of(arena, program))
    }

    pub fn contains_program(&self, key: &ProgramKey) -> bool {
        self.program_symbols.contains_key(key)
    }

    /// Number of program tables currently held.
    pub fn len(&self) -> usize {
        self.program_symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program_symbols.is_empty()
    }

    /// Every program table, ordered by key, for bulk export and debugging.
    pub fn get_program_symbols(&self) -> BTreeMap<ProgramKey, SharedSymbolTable> {
        self.program_symbols
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Paragraph references of a program (empty when the program has no
    /// table).
    pub fn get_paragraph_map(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
    ) -> FxIndexMap<String, CodeBlockReference> {
        self.existing_program_table(arena, program)
            .map(|table| read_table(&table).paragraphs().clone())
            .unwrap_or_default()
    }

    /// Section references of a program (empty when the program has no
    /// table).
    pub fn get_section_map(
        &self,
        arena: &NodeArena,
        program: NodeIndex,
    ) -> FxIndexMap<String, CodeBlockReference> {
        self.existing_program_table(arena, program)
            .map(|table| read_table(&table).sections().clone())
            .unwrap_or_default()
    }

    /// Variable multi-map of a program (empty when the program has no table).
    pub fn get_variables(&self, arena: &NodeArena, program: NodeIndex) -> VariableMap {
        self.existing_program_table(arena, program)
            .map(|table| read_table(&table).variables().clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Drop every table belonging to the document at `document_uri`: keys
    /// ending in `%<uri>` and a key equal to the bare URI. Resetting an
    /// unknown document does nothing.
    pub fn reset(&self, document_uri: &str) {
        let before = self.program_symbols.len();
        self.program_symbols
            .retain(|key, _| !key.belongs_to(document_uri));
        let removed = before.saturating_sub(self.program_symbols.len());
        debug!(uri = %document_uri, removed, "SymbolService::reset");
    }

    /// Drop all tables (server shutdown).
    pub fn clear(&self) {
        self.program_symbols.clear();
    }
}

/// Read a table, recovering from a poisoned lock.
pub fn read_table(table: &RwLock<SymbolTable>) -> RwLockReadGuard<'_, SymbolTable> {
    table.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write a table, recovering from a poisoned lock.
pub fn write_table(table: &RwLock<SymbolTable>) -> RwLockWriteGuard<'_, SymbolTable> {
    table.write().unwrap_or_else(PoisonError::into_inner)
}
