//! Arena syntax tree consumed by the COBOL symbol engine.
//!
//! The parser front end produces this tree; the symbol engine only reads it,
//! apart from attaching resolved usage locations to definition nodes.

pub mod node;
pub use node::{CodeBlockData, CopyData, Node, NodeIndex, NodeKind, UsageData, VariableData};

pub mod arena;
pub use arena::{Ancestors, DepthFirst, NodeArena};

pub mod builder;
pub use builder::TreeBuilder;

pub mod lookup;
pub use lookup::find_node_by_position;

pub mod source;
pub use source::{SourceKind, SourceNode};

/// The output of one analysis run: the node arena and its root.
#[derive(Clone, Debug, Default)]
pub struct AnalysisResult {
    pub arena: NodeArena,
    pub root: NodeIndex,
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod arena_tests;
