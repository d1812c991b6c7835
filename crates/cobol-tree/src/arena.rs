//! Arena storage and navigation for syntax-tree nodes.

use crate::node::{Node, NodeIndex, NodeKind};
use cobol_common::limits::MAX_ANCESTOR_WALK;
use cobol_common::{Locality, Location};

/// Owns every node of one analysis run.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node under `parent` (or as a detached root when `parent` is
    /// `NONE`). Children keep insertion order, which callers use as
    /// document order.
    pub fn add(&mut self, parent: NodeIndex, kind: NodeKind, locality: Locality) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let program = match self.get(parent) {
            Some(parent_node) if parent_node.kind.is_program() => parent,
            Some(parent_node) => parent_node.program,
            None => NodeIndex::NONE,
        };
        let parent = if self.get(parent).is_some() {
            parent
        } else {
            NodeIndex::NONE
        };
        self.nodes.push(Node {
            kind,
            locality,
            parent,
            children: Vec::new(),
            program,
        });
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(idx);
        }
        idx
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get_mut(idx.0 as usize)
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<&NodeKind> {
        self.get(idx).map(|n| &n.kind)
    }

    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.get(idx).and_then(Node::name)
    }

    pub fn locality(&self, idx: NodeIndex) -> Option<&Locality> {
        self.get(idx).map(|n| &n.locality)
    }

    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.get(idx).map_or(NodeIndex::NONE, |n| n.parent)
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.get(idx) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// The program that owns `idx`, if any.
    pub fn owning_program(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.get(idx).and_then(|n| n.program.to_option())
    }

    /// Parent chain of `idx`, nearest first, excluding `idx` itself.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.parent(idx),
            steps: 0,
        }
    }

    /// Pre-order walk of the subtree rooted at `idx`, including `idx`.
    pub fn depth_first(&self, idx: NodeIndex) -> DepthFirst<'_> {
        let stack = if self.get(idx).is_some() {
            vec![(idx, 0)]
        } else {
            Vec::new()
        };
        DepthFirst { arena: self, stack }
    }

    /// Name of the procedure section lexically enclosing `idx`, or `""`.
    pub fn enclosing_section_name(&self, idx: NodeIndex) -> &str {
        self.ancestors(idx)
            .find_map(|ancestor| match self.kind(ancestor) {
                Some(NodeKind::ProcedureSection(data)) => Some(data.name.as_str()),
                _ => None,
            })
            .unwrap_or("")
    }

    /// Record a resolved usage on a definition node. Returns `false` when the
    /// node is not a paragraph, section or variable definition.
    pub fn add_usage(&mut self, idx: NodeIndex, location: Location) -> bool {
        match self.get_mut(idx).map(|n| &mut n.kind) {
            Some(NodeKind::Paragraph(data) | NodeKind::ProcedureSection(data)) => {
                data.usages.push(location);
                true
            }
            Some(NodeKind::VariableDefinition(data)) => {
                data.usages.push(location);
                true
            }
            _ => false,
        }
    }

    /// Attach the resolved declarations to a variable usage node.
    pub fn set_usage_definitions(&mut self, idx: NodeIndex, definitions: Vec<NodeIndex>) -> bool {
        match self.get_mut(idx).map(|n| &mut n.kind) {
            Some(NodeKind::VariableUsage(data)) => {
                data.definitions = definitions;
                true
            }
            _ => false,
        }
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    next: NodeIndex,
    steps: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.steps >= MAX_ANCESTOR_WALK {
            return None;
        }
        let current = self.next;
        let node = self.arena.get(current)?;
        self.next = node.parent;
        self.steps += 1;
        Some(current)
    }
}

/// Pre-order iterator yielding `(index, depth)` pairs; depth is relative to
/// the starting node.
pub struct DepthFirst<'a> {
    arena: &'a NodeArena,
    stack: Vec<(NodeIndex, usize)>,
}

impl DepthFirst<'_> {
    /// Drop the depth and yield indices only.
    pub fn indices(self) -> impl Iterator<Item = NodeIndex> {
        self.map(|(idx, _)| idx)
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = (NodeIndex, usize);

    fn next(&mut self) -> Option<(NodeIndex, usize)> {
        let (idx, depth) = self.stack.pop()?;
        let children = self.arena.children(idx);
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((idx, depth))
    }
}
