//! Which layer and in-layer position a node occupies at its current coordinates.

use crate::layers::Layer;
use crate::model::{Direction, Node};

/// Layer the node would land in if dropped at its live position.
///
/// Returns `layers.len()` when the node is beyond the last band and would open a new trailing
/// layer, unless it is the selected node and already the only member of the last layer.
pub fn layer_of_node(node: &Node, nodes: &[&Node], layers: &[Layer], direction: Direction) -> usize {
    if layers.is_empty() {
        return 0;
    }

    let center = node.rect().flow_center(direction);
    if let Some(ix) = layers.iter().position(|l| center < l.right_x) {
        return ix;
    }

    let last = layers.len() - 1;
    match nodes_of_layer(last, nodes).as_slice() {
        [only] if only.id == node.id && only.selected => last,
        _ => layers.len(),
    }
}

/// Members of `layer`, in input order.
pub fn nodes_of_layer<'a>(layer: usize, nodes: &[&'a Node]) -> Vec<&'a Node> {
    nodes
        .iter()
        .copied()
        .filter(|n| n.layer_id == layer)
        .collect()
}

/// Coordinate that orders nodes inside a layer.
fn cross_coordinate(node: &Node, direction: Direction) -> f64 {
    node.rect().cross_span(direction).0
}

/// Layer members sorted by their live cross-axis coordinate. Ties keep input order.
pub fn sort_layer<'a>(layer_nodes: &[&'a Node], direction: Direction) -> Vec<&'a Node> {
    let mut sorted = layer_nodes.to_vec();
    sorted.sort_by(|a, b| {
        cross_coordinate(a, direction).total_cmp(&cross_coordinate(b, direction))
    });
    sorted
}

/// Index the target takes among `layer_nodes` when they are ordered along the cross axis.
pub fn position_in_layer(layer_nodes: &[&Node], target: &Node, direction: Direction) -> usize {
    let sorted = sort_layer(layer_nodes, direction);
    if let Some(ix) = sorted.iter().position(|n| n.id == target.id) {
        return ix;
    }

    let coordinate = cross_coordinate(target, direction);
    sorted
        .iter()
        .position(|n| coordinate < cross_coordinate(n, direction))
        .unwrap_or(sorted.len())
}
