//! Absolute layer/position constraints and their cascading shifts.
//!
//! Layer and position indices in a snapshot are *raw*: they describe where the layout put a node.
//! A constraint that pushed a node further than its raw index shifts every node behind it by
//! the same amount, so a raw candidate index has to be corrected before it can be sent as a
//! constraint value.

use serde::Serialize;
use tracing::debug;

use crate::conflict::is_layer_forbidden;
use crate::layers::Layer;
use crate::model::{LevelGraph, Node};
use crate::resolve::{layer_of_node, nodes_of_layer, position_in_layer, sort_layer};

/// Corrects a raw layer candidate for layer constraints of nodes at or before it.
///
/// Among the other nodes with `layer_id <= candidate` whose `layer_cons` exceeds their
/// `layer_id`, the one with the largest `layer_cons` decides: its offset is carried over to the
/// candidate. Only that single maximum is considered.
pub fn actual_layer(node: &Node, nodes: &[&Node], candidate: usize) -> usize {
    let mut boosted: Option<(usize, usize)> = None;
    for n in nodes {
        if n.id == node.id || n.layer_id > candidate {
            continue;
        }
        let Some(cons) = n.layer_cons.filter(|&cons| cons > n.layer_id) else {
            continue;
        };
        if boosted.is_none_or(|(max, _)| cons > max) {
            boosted = Some((cons, n.layer_id));
        }
    }

    match boosted {
        Some((max, layer_id)) => max + (candidate - layer_id),
        None => candidate,
    }
}

/// Corrects a raw in-layer index for the position constraint of the member right above it.
///
/// `layer_members` must be sorted along the cross axis. When the upper neighbour is pinned
/// further down than its raw index, the target moves behind it: onto the pinned index if the
/// target previously held the neighbour's slot, one past it otherwise.
pub fn actual_target_index(
    target_index: usize,
    already_in_layer: bool,
    layer_members: &[&Node],
) -> usize {
    let Some(upper_ix) = target_index.checked_sub(1) else {
        return target_index;
    };
    let Some(upper) = layer_members.get(upper_ix) else {
        return target_index;
    };

    match upper.pos_cons {
        Some(pos_cons) if pos_cons > upper_ix => {
            if already_in_layer && upper.pos_id == target_index {
                pos_cons
            } else {
                pos_cons + 1
            }
        }
        _ => target_index,
    }
}

/// Absolute constraint implied by dropping a node at its live position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AbsoluteConstraint {
    /// The node moves into an empty or new layer: only the layer is pinned.
    Layer { target: String, layer: usize },
    /// The node stays in its layer: only the position is pinned.
    Position { target: String, position: usize },
    /// The node changes into a populated layer: both are pinned.
    Static {
        target: String,
        layer: usize,
        position: usize,
    },
    /// A neighbour is already pinned to the candidate layer.
    Forbidden { target: String },
    /// The node is back in its own layer and slot.
    Unchanged { target: String },
}

/// Infers the absolute constraint for `target` at its live position.
pub fn determine_absolute(g: &LevelGraph, layers: &[Layer], target: &Node) -> AbsoluteConstraint {
    let direction = target.direction;
    let nodes: Vec<&Node> = g.node_labels().collect();

    let layer = layer_of_node(target, &nodes, layers, direction);
    let members = sort_layer(&nodes_of_layer(layer, &nodes), direction);
    let raw_position = position_in_layer(&members, target, direction);
    let is_member = members.iter().any(|n| n.id == target.id);

    let position = actual_target_index(raw_position, is_member, &members);
    let effective_layer = actual_layer(target, &nodes, layer);

    if is_layer_forbidden(g, target, effective_layer) {
        debug!(node = %target.id, layer = effective_layer, "layer constraint vetoed: a neighbour is pinned there");
        return AbsoluteConstraint::Forbidden {
            target: target.id.clone(),
        };
    }

    let target_id = target.id.clone();
    let constraint = if layer != target.layer_id {
        // The target is not a member of a layer it is moving into.
        if members.is_empty() {
            AbsoluteConstraint::Layer {
                target: target_id,
                layer: effective_layer,
            }
        } else {
            AbsoluteConstraint::Static {
                target: target_id,
                layer: effective_layer,
                position,
            }
        }
    } else if raw_position != target.pos_id {
        AbsoluteConstraint::Position {
            target: target_id,
            position,
        }
    } else {
        AbsoluteConstraint::Unchanged { target: target_id }
    };
    debug!(node = %target.id, raw_layer = layer, raw_position, ?constraint, "inferred absolute constraint");
    constraint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, Size};

    fn node(id: &str, layer_id: usize, pos_id: usize) -> Node {
        Node::new(id, Point::default(), Size::new(10.0, 10.0)).in_layer(layer_id, pos_id)
    }

    #[test]
    fn first_slot_is_never_shifted() {
        let pinned = node("a", 0, 0).with_pos_cons(4);
        assert_eq!(actual_target_index(0, false, &[&pinned]), 0);
    }

    #[test]
    fn index_past_the_end_is_kept() {
        let a = node("a", 0, 0);
        assert_eq!(actual_target_index(5, false, &[&a]), 5);
    }

    #[test]
    fn target_that_held_the_slot_lands_on_the_pinned_index() {
        let upper = node("a", 0, 3).with_pos_cons(5);
        let members = [&node("x", 0, 0), &node("y", 0, 1), &upper];
        assert_eq!(actual_target_index(3, true, &members), 5);
    }

    #[test]
    fn unconstrained_nodes_do_not_shift_the_layer() {
        let a = node("a", 0, 0);
        let b = node("b", 1, 0).with_layer_cons(1);
        let moved = node("m", 2, 0);
        assert_eq!(actual_layer(&moved, &[&a, &b, &moved], 1), 1);
    }

    #[test]
    fn moved_node_ignores_its_own_layer_constraint() {
        let moved = node("m", 0, 0).with_layer_cons(3);
        assert_eq!(actual_layer(&moved, &[&moved], 1), 1);
    }

    #[test]
    fn largest_constraint_wins() {
        let a = node("a", 0, 0).with_layer_cons(2);
        let b = node("b", 1, 0).with_layer_cons(4);
        let moved = node("m", 3, 0);
        // b: 4 + (2 - 1)
        assert_eq!(actual_layer(&moved, &[&a, &b, &moved], 2), 5);
    }
}
