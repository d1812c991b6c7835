//! Position-based element lookup for navigation and hover.

use crate::code_block::CodeBlockReference;
use crate::service::SymbolService;
use cobol_common::{Location, Position};
use cobol_tree::{
    AnalysisResult, CodeBlockData, NodeArena, NodeIndex, NodeKind, find_node_by_position,
};
use serde::Serialize;
use tracing::trace;

/// Definitions and usages of the construct under the cursor.
///
/// This is a detached copy: filtering it never touches the references held
/// by the symbol tables or the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    /// Node kind label (`variable`, `paragraphName`, ...).
    pub kind: &'static str,
    pub definitions: Vec<Location>,
    pub usages: Vec<Location>,
}

impl SymbolService {
    /// The element whose node covers `position` in `document_uri`.
    ///
    /// `None` when no node covers the position or the deepest covering node
    /// has no definitions/usages context. Locations in implicitly injected
    /// documents are left out of the result.
    #[tracing::instrument(level = "debug", skip(self, result), fields(line = position.line, character = position.character))]
    pub fn find_element_by_position(
        &self,
        result: &AnalysisResult,
        document_uri: &str,
        position: Position,
    ) -> Option<Element> {
        let arena = &result.arena;
        let node = find_node_by_position(arena, result.root, document_uri, position)?;
        let mut element = self.element_context(arena, node)?;
        let before = element.definitions.len() + element.usages.len();
        element
            .definitions
            .retain(|location| !self.options.is_implicit(&location.uri));
        element
            .usages
            .retain(|location| !self.options.is_implicit(&location.uri));
        trace!(
            node = node.0,
            dropped = before - element.definitions.len() - element.usages.len(),
            "element found"
        );
        Some(element)
    }

    /// Unfiltered context of `node`, if its kind carries one.
    pub fn element_context(&self, arena: &NodeArena, node: NodeIndex) -> Option<Element> {
        let n = arena.get(node)?;
        let (definitions, usages) = match &n.kind {
            NodeKind::VariableDefinition(data) => {
                (vec![n.locality.to_location()], data.usages.clone())
            }
            NodeKind::VariableUsage(data) => {
                let mut definitions = Vec::with_capacity(data.definitions.len());
                let mut usages = Vec::new();
                for &decl in &data.definitions {
                    if let Some(decl_node) = arena.get(decl) {
                        definitions.push(decl_node.locality.to_location());
                    }
                    if let Some(NodeKind::VariableDefinition(decl_data)) = arena.kind(decl) {
                        usages.extend(decl_data.usages.iter().cloned());
                    }
                }
                (definitions, usages)
            }
            NodeKind::ParagraphName { name }
            | NodeKind::CodeBlockUsage { name }
            | NodeKind::Paragraph(CodeBlockData { name, .. }) => {
                let program = arena.owning_program(node)?;
                let reference = self
                    .get_code_block_reference(arena, program, name)
                    .unwrap_or_default();
                (reference.definitions().to_vec(), reference.usages().to_vec())
            }
            NodeKind::SectionName { .. } | NodeKind::ProcedureSection(_) => (
                self.get_section_locations(arena, node, CodeBlockReference::definitions),
                self.get_section_locations(arena, node, CodeBlockReference::usages),
            ),
            NodeKind::Copy(data) => (
                data.definition.iter().cloned().collect(),
                vec![n.locality.to_location()],
            ),
            _ => return None,
        };
        Some(Element {
            name: n.name().unwrap_or_default().to_string(),
            kind: n.kind.label(),
            definitions,
            usages,
        })
    }
}
