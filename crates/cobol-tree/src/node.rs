//! Node types for the arena syntax tree.
//!
//! Nodes are addressed by [`NodeIndex`]. Each node stores its parent, its
//! children in document order, and the nearest enclosing program, so
//! ancestor walks and owning-program lookups never need ownership cycles.

use cobol_common::{CopybookName, Locality, Location};

/// Index of a node in a [`crate::NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// `None` for the sentinel, `Some(self)` otherwise.
    #[inline]
    pub const fn to_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// A data-division declaration (group item, elementary item, index item...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableData {
    pub name: String,
    /// Level number as written (01, 05, 77, 88...).
    pub level: u8,
    /// Declared with the GLOBAL clause.
    pub global: bool,
    /// Usage locations attached by resolution.
    pub usages: Vec<Location>,
}

impl VariableData {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        VariableData {
            name: name.into(),
            level,
            global: false,
            usages: Vec::new(),
        }
    }

    #[must_use]
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }
}

/// A reference to a variable by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageData {
    pub name: String,
    /// Declarations this usage resolved to.
    pub definitions: Vec<NodeIndex>,
}

impl UsageData {
    pub fn new(name: impl Into<String>) -> Self {
        UsageData {
            name: name.into(),
            definitions: Vec::new(),
        }
    }
}

/// A paragraph or section body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlockData {
    pub name: String,
    /// Usage locations bound to this definition.
    pub usages: Vec<Location>,
}

impl CodeBlockData {
    pub fn new(name: impl Into<String>) -> Self {
        CodeBlockData {
            name: name.into(),
            usages: Vec::new(),
        }
    }
}

/// A COPY statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyData {
    pub name: CopybookName,
    /// Where the copybook content lives, once resolved.
    pub definition: Option<Location>,
}

/// Node kinds the symbol engine distinguishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Program { name: String },
    /// WORKING-STORAGE, LINKAGE, LOCAL-STORAGE, FILE...
    DataSection { name: String },
    VariableDefinition(VariableData),
    VariableUsage(UsageData),
    /// `A OF B OF C`: `VariableUsage` children in written order.
    QualifiedReference,
    ProcedureSection(CodeBlockData),
    SectionName { name: String },
    Paragraph(CodeBlockData),
    ParagraphName { name: String },
    CodeBlockUsage { name: String },
    Perform,
    GoTo,
    /// A sentence-style statement naming a code block.
    Sentence,
    Copy(CopyData),
    /// Any other statement.
    Statement,
}

impl NodeKind {
    /// The name a node carries, if it is a named construct.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Program { name }
            | NodeKind::DataSection { name }
            | NodeKind::SectionName { name }
            | NodeKind::ParagraphName { name }
            | NodeKind::CodeBlockUsage { name } => Some(name),
            NodeKind::VariableDefinition(data) => Some(&data.name),
            NodeKind::VariableUsage(data) => Some(&data.name),
            NodeKind::ProcedureSection(data) | NodeKind::Paragraph(data) => Some(&data.name),
            NodeKind::Copy(data) => Some(&data.name.display_name),
            NodeKind::Root
            | NodeKind::QualifiedReference
            | NodeKind::Perform
            | NodeKind::GoTo
            | NodeKind::Sentence
            | NodeKind::Statement => None,
        }
    }

    /// Paragraph or section body.
    pub const fn is_code_block_definition(&self) -> bool {
        matches!(self, NodeKind::Paragraph(_) | NodeKind::ProcedureSection(_))
    }

    /// Statements that may qualify a code-block usage with `OF <section>`.
    pub const fn is_code_block_statement(&self) -> bool {
        matches!(self, NodeKind::Perform | NodeKind::GoTo | NodeKind::Sentence)
    }

    pub const fn is_program(&self) -> bool {
        matches!(self, NodeKind::Program { .. })
    }

    /// Short lowercase label for logging.
    pub const fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Program { .. } => "program",
            NodeKind::DataSection { .. } => "dataSection",
            NodeKind::VariableDefinition(_) => "variable",
            NodeKind::VariableUsage(_) => "variableUsage",
            NodeKind::QualifiedReference => "qualifiedReference",
            NodeKind::ProcedureSection(_) => "procedureSection",
            NodeKind::SectionName { .. } => "sectionName",
            NodeKind::Paragraph(_) => "paragraph",
            NodeKind::ParagraphName { .. } => "paragraphName",
            NodeKind::CodeBlockUsage { .. } => "codeBlockUsage",
            NodeKind::Perform => "perform",
            NodeKind::GoTo => "goTo",
            NodeKind::Sentence => "sentence",
            NodeKind::Copy(_) => "copy",
            NodeKind::Statement => "statement",
        }
    }
}

/// A node in the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub locality: Locality,
    pub parent: NodeIndex,
    pub children: Vec<NodeIndex>,
    /// Nearest enclosing program. For a program node this is the program
    /// that contains it (`NONE` for an outermost program).
    pub program: NodeIndex,
}

impl Node {
    pub fn name(&self) -> Option<&str> {
        self.kind.name()
    }
}
