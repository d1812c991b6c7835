//! Serialized tree model.
//!
//! Front ends hand the tree over as nested JSON. Each object carries a
//! `type` tag, a `range`, optional `uri`/`copybook` overrides (inherited by
//! descendants) and its `children`:
//!
//! ```json
//! { "type": "program", "name": "TEST", "range": { ... }, "children": [
//!     { "type": "paragraph", "name": "MAIN", "range": { ... }, "children": [] }
//! ] }
//! ```

use crate::AnalysisResult;
use crate::arena::NodeArena;
use crate::node::{CodeBlockData, CopyData, NodeIndex, NodeKind, UsageData, VariableData};
use cobol_common::{CopybookName, Locality, Location, Range};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceKind {
    Root,
    Program {
        name: String,
    },
    DataSection {
        name: String,
    },
    Variable {
        name: String,
        #[serde(default)]
        level: u8,
        #[serde(default)]
        global: bool,
    },
    VariableUsage {
        name: String,
    },
    QualifiedReference,
    ProcedureSection {
        name: String,
    },
    SectionName {
        name: String,
    },
    Paragraph {
        name: String,
    },
    ParagraphName {
        name: String,
    },
    CodeBlockUsage {
        name: String,
    },
    Perform,
    GoTo,
    Sentence,
    Copy {
        name: String,
        #[serde(default)]
        dialect: Option<String>,
        #[serde(default)]
        definition: Option<Location>,
    },
    Statement,
}

impl From<SourceKind> for NodeKind {
    fn from(kind: SourceKind) -> NodeKind {
        match kind {
            SourceKind::Root => NodeKind::Root,
            SourceKind::Program { name } => NodeKind::Program { name },
            SourceKind::DataSection { name } => NodeKind::DataSection { name },
            SourceKind::Variable {
                name,
                level,
                global,
            } => NodeKind::VariableDefinition(VariableData {
                name,
                level,
                global,
                usages: Vec::new(),
            }),
            SourceKind::VariableUsage { name } => NodeKind::VariableUsage(UsageData::new(name)),
            SourceKind::QualifiedReference => NodeKind::QualifiedReference,
            SourceKind::ProcedureSection { name } => {
                NodeKind::ProcedureSection(CodeBlockData::new(name))
            }
            SourceKind::SectionName { name } => NodeKind::SectionName { name },
            SourceKind::Paragraph { name } => NodeKind::Paragraph(CodeBlockData::new(name)),
            SourceKind::ParagraphName { name } => NodeKind::ParagraphName { name },
            SourceKind::CodeBlockUsage { name } => NodeKind::CodeBlockUsage { name },
            SourceKind::Perform => NodeKind::Perform,
            SourceKind::GoTo => NodeKind::GoTo,
            SourceKind::Sentence => NodeKind::Sentence,
            SourceKind::Copy {
                name,
                dialect,
                definition,
            } => NodeKind::Copy(CopyData {
                name: CopybookName {
                    display_name: name,
                    dialect_type: dialect,
                },
                definition,
            }),
            SourceKind::Statement => NodeKind::Statement,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    #[serde(flatten)]
    pub kind: SourceKind,
    #[serde(default)]
    pub range: Range,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub copybook: Option<String>,
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// Lower into an arena. `uri` applies to every node that neither sets
    /// nor inherits its own.
    pub fn into_analysis_result(self, uri: &str) -> AnalysisResult {
        let mut arena = NodeArena::new();
        let root = if matches!(self.kind, SourceKind::Root) {
            self.lower(&mut arena, NodeIndex::NONE, uri, None)
        } else {
            // Wrap a bare program in a root so every tree has the same shape.
            let root = arena.add(
                NodeIndex::NONE,
                NodeKind::Root,
                Locality::new(self.uri.clone().unwrap_or_else(|| uri.to_string()), Range::default()),
            );
            self.lower(&mut arena, root, uri, None);
            root
        };
        AnalysisResult { arena, root }
    }

    fn lower(
        self,
        arena: &mut NodeArena,
        parent: NodeIndex,
        inherited_uri: &str,
        inherited_copybook: Option<&str>,
    ) -> NodeIndex {
        let uri = self.uri.as_deref().unwrap_or(inherited_uri).to_string();
        let copybook = self.copybook.as_deref().or(inherited_copybook).map(str::to_string);
        let mut locality = Locality::new(uri.clone(), self.range);
        locality.copybook_id = copybook.clone();

        let idx = arena.add(parent, self.kind.into(), locality);
        for child in self.children {
            child.lower(arena, idx, &uri, copybook.as_deref());
        }
        idx
    }
}
