//! Per-program symbol tables.

use crate::code_block::CodeBlockReference;
use cobol_common::Location;
use cobol_tree::{NodeArena, NodeIndex, NodeKind};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Declarations sharing one name. Most names have exactly one.
pub type Declarations = SmallVec<[NodeIndex; 2]>;

/// Variable multi-map: normalized name -> declaration nodes, in
/// registration order.
pub type VariableMap = FxIndexMap<String, Declarations>;

/// Names are case-insensitive; every map is keyed by the uppercase form.
#[inline]
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

// =============================================================================
// ProgramKey
// =============================================================================

/// Separates the program name from the declaring document URI.
pub const PROGRAM_KEY_SEPARATOR: char = '%';

/// `programName%declaringDocumentUri`.
///
/// Distinguishes same-named programs declared in different documents. A key
/// may degenerate to the bare URI when the program name is not known yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProgramKey(String);

impl ProgramKey {
    pub fn new(program_name: &str, uri: &str) -> Self {
        ProgramKey(format!("{program_name}{PROGRAM_KEY_SEPARATOR}{uri}"))
    }

    /// Key for the program node at `program`.
    ///
    /// Nodes that are not programs (partial trees) degrade to their URI.
    pub fn of(arena: &NodeArena, program: NodeIndex) -> Self {
        match arena.get(program) {
            Some(node) => match &node.kind {
                NodeKind::Program { name } => ProgramKey::new(name, &node.locality.uri),
                _ => ProgramKey(node.locality.uri.clone()),
            },
            None => ProgramKey(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key belongs to the document at `uri`.
    pub fn belongs_to(&self, uri: &str) -> bool {
        self.0 == uri
            || self
                .0
                .strip_suffix(uri)
                .is_some_and(|prefix| prefix.ends_with(PROGRAM_KEY_SEPARATOR))
    }
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// SymbolTable
// =============================================================================

/// Variables, code blocks, paragraphs and sections of exactly one program.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    pub(crate) variables: VariableMap,
    /// Paragraph and section bodies, in registration order.
    pub(crate) code_blocks: Vec<NodeIndex>,
    pub(crate) paragraphs: FxIndexMap<String, CodeBlockReference>,
    pub(crate) sections: FxIndexMap<String, CodeBlockReference>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Declarations registered under `name` (case-insensitive).
    pub fn variables_named(&self, name: &str) -> &[NodeIndex] {
        match self.variables.get(&normalize_name(name)) {
            Some(decls) => decls.as_slice(),
            None => &[],
        }
    }

    pub fn code_blocks(&self) -> &[NodeIndex] {
        &self.code_blocks
    }

    pub fn paragraphs(&self) -> &FxIndexMap<String, CodeBlockReference> {
        &self.paragraphs
    }

    pub fn sections(&self) -> &FxIndexMap<String, CodeBlockReference> {
        &self.sections
    }

    pub fn paragraph(&self, name: &str) -> Option<&CodeBlockReference> {
        self.paragraphs.get(&normalize_name(name))
    }

    pub fn section(&self, name: &str) -> Option<&CodeBlockReference> {
        self.sections.get(&normalize_name(name))
    }

    pub fn insert_variable(&mut self, name: &str, node: NodeIndex) {
        self.variables
            .entry(normalize_name(name))
            .or_default()
            .push(node);
    }

    /// Reference for paragraph `name`, created on first use.
    pub fn paragraph_entry(&mut self, name: &str) -> &mut CodeBlockReference {
        self.paragraphs.entry(normalize_name(name)).or_default()
    }

    pub fn section_entry(&mut self, name: &str) -> &mut CodeBlockReference {
        self.sections.entry(normalize_name(name)).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.code_blocks.is_empty()
            && self.paragraphs.is_empty()
            && self.sections.is_empty()
    }

    /// Serializable view resolving node indices against `arena`.
    pub fn snapshot(&self, arena: &NodeArena) -> SymbolTableSnapshot {
        let variables = self
            .variables
            .iter()
            .map(|(name, decls)| {
                let locations = decls
                    .iter()
                    .filter_map(|&decl| arena.locality(decl))
                    .map(|locality| locality.to_location())
                    .collect();
                (name.clone(), locations)
            })
            .collect();
        SymbolTableSnapshot {
            variables,
            paragraphs: self.paragraphs.clone(),
            sections: self.sections.clone(),
        }
    }
}

/// Export form of a [`SymbolTable`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SymbolTableSnapshot {
    pub variables: FxIndexMap<String, Vec<Location>>,
    pub paragraphs: FxIndexMap<String, CodeBlockReference>,
    pub sections: FxIndexMap<String, CodeBlockReference>,
}
