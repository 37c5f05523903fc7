//! Vetoes for constraints that would contradict the graph structure.

use crate::model::{LevelGraph, Node};

/// Whether `b` is a direct neighbour of `a`, i.e. an edge runs between them in either direction.
///
/// Ordering two such nodes inside one layer would contradict the edge, so relative constraints
/// between them are never proposed.
pub fn is_forbidden(g: &LevelGraph, a: &str, b: &str) -> bool {
    g.is_adjacent(a, b)
}

/// Whether a neighbour of `node` is pinned to `layer` by its own layer constraint.
pub fn is_layer_forbidden(g: &LevelGraph, node: &Node, layer: usize) -> bool {
    g.neighbors(&node.id)
        .into_iter()
        .filter(|&id| id != node.id)
        .filter_map(|id| g.node(id))
        .any(|n| n.layer_cons == Some(layer))
}
