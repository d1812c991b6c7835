//! Position lookups.

use crate::arena::NodeArena;
use crate::node::NodeIndex;
use cobol_common::Position;

/// Find the deepest node written in `uri` whose range contains `position`.
///
/// Copybook content sits in the tree under the COPY statement but carries the
/// copybook's URI, so containment is checked per node rather than by
/// pruning whole subtrees.
pub fn find_node_by_position(
    arena: &NodeArena,
    root: NodeIndex,
    uri: &str,
    position: Position,
) -> Option<NodeIndex> {
    let mut best: Option<(NodeIndex, usize)> = None;
    for (idx, depth) in arena.depth_first(root) {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        if node.locality.uri != uri || !node.locality.range.contains(position) {
            continue;
        }
        if best.is_none_or(|(_, best_depth)| depth > best_depth) {
            best = Some((idx, depth));
        }
    }
    best.map(|(idx, _)| idx)
}
