//! Programmatic tree construction.
//!
//! The builder keeps a stack of open nodes; `open` pushes, `close` pops, and
//! `leaf` adds a child without descending into it.
//!
//! ```ignore
//! let mut b = TreeBuilder::new("file:///test.cbl");
//! b.open(NodeKind::Program { name: "TEST".into() }, Range::on_line(0, 0, 80));
//! b.leaf(NodeKind::ParagraphName { name: "MAIN".into() }, Range::on_line(5, 7, 11));
//! b.close();
//! let result = b.finish();
//! ```

use crate::AnalysisResult;
use crate::arena::NodeArena;
use crate::node::{NodeIndex, NodeKind};
use cobol_common::{Locality, Range};

pub struct TreeBuilder {
    arena: NodeArena,
    root: NodeIndex,
    stack: Vec<NodeIndex>,
    uri: String,
}

impl TreeBuilder {
    /// Start a tree for the document at `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let mut arena = NodeArena::new();
        let root = arena.add(
            NodeIndex::NONE,
            NodeKind::Root,
            Locality::new(uri.clone(), Range::default()),
        );
        TreeBuilder {
            arena,
            root,
            stack: vec![root],
            uri,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The node new children are attached to.
    pub fn current(&self) -> NodeIndex {
        self.stack.last().copied().unwrap_or(self.root)
    }

    /// Add a node in the builder's document and descend into it.
    pub fn open(&mut self, kind: NodeKind, range: Range) -> NodeIndex {
        let locality = Locality::new(self.uri.clone(), range);
        self.open_at(kind, locality)
    }

    /// Add a node with an explicit locality (e.g. copybook content) and
    /// descend into it.
    pub fn open_at(&mut self, kind: NodeKind, locality: Locality) -> NodeIndex {
        let idx = self.arena.add(self.current(), kind, locality);
        self.stack.push(idx);
        idx
    }

    /// Add a node in the builder's document without descending into it.
    pub fn leaf(&mut self, kind: NodeKind, range: Range) -> NodeIndex {
        let locality = Locality::new(self.uri.clone(), range);
        self.leaf_at(kind, locality)
    }

    pub fn leaf_at(&mut self, kind: NodeKind, locality: Locality) -> NodeIndex {
        self.arena.add(self.current(), kind, locality)
    }

    /// Return to the parent of the innermost open node. The root is never
    /// popped.
    pub fn close(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn finish(self) -> AnalysisResult {
        AnalysisResult {
            arena: self.arena,
            root: self.root,
        }
    }
}
