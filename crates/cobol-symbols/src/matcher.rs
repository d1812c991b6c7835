//! Qualifier-chain matching for variable usages.
//!
//! A usage chain is the written reference split into nodes: `FIELD OF GROUP
//! OF RECORD` is `[FIELD, GROUP, RECORD]`. The head names the variable; every
//! following node must name one of its enclosing group items, in order from
//! the nearest outwards, though intermediate levels may be skipped.

use crate::symbol_table::{VariableMap, normalize_name};
use cobol_tree::{NodeArena, NodeIndex, NodeKind};
use rustc_hash::FxHashSet;

/// Maps a usage chain to the declarations it can refer to.
///
/// Implementations must be pure: the same map and chain always produce the
/// same candidates in the same order.
pub trait VariableMatcher: Send + Sync {
    fn find_variables_for_usage(
        &self,
        arena: &NodeArena,
        variables: &VariableMap,
        usage_chain: &[NodeIndex],
    ) -> Vec<NodeIndex>;
}

/// Matches the head by name and the qualifiers against enclosing group
/// items.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualifiedNameMatcher;

/// Group items named by each qualifier of a chain, walking outwards from
/// `declaration`. `None` when some qualifier names no enclosing group in
/// order.
pub fn qualifier_groups(
    arena: &NodeArena,
    declaration: NodeIndex,
    qualifiers: &[NodeIndex],
) -> Option<Vec<NodeIndex>> {
    let mut ancestors = arena.ancestors(declaration);
    qualifiers
        .iter()
        .map(|&qualifier| {
            let name = arena.name(qualifier)?;
            ancestors.find(|&ancestor| {
                matches!(
                    arena.kind(ancestor),
                    Some(NodeKind::VariableDefinition(data)) if data.name.eq_ignore_ascii_case(name)
                )
            })
        })
        .collect()
}

impl VariableMatcher for QualifiedNameMatcher {
    fn find_variables_for_usage(
        &self,
        arena: &NodeArena,
        variables: &VariableMap,
        usage_chain: &[NodeIndex],
    ) -> Vec<NodeIndex> {
        let Some((&head, qualifier_nodes)) = usage_chain.split_first() else {
            return Vec::new();
        };
        let Some(name) = arena.name(head) else {
            return Vec::new();
        };
        let Some(candidates) = variables.get(&normalize_name(name)) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        candidates
            .iter()
            .copied()
            .filter(|&candidate| qualifier_groups(arena, candidate, qualifier_nodes).is_some())
            .filter(|candidate| seen.insert(*candidate))
            .collect()
    }
}
