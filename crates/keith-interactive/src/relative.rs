//! Inference of in-layer ordering constraints from a dragged node's position.
//!
//! The dragged node is compared with the members directly above and below the slot it was
//! dropped into. Whichever neighbour it ends up closer to on the cross axis becomes the
//! proposed relation: closer to the predecessor means "successor of the predecessor", closer
//! to the successor means "predecessor of the successor".

use serde::Serialize;
use tracing::{debug, trace};

use crate::conflict::is_forbidden;
use crate::layers::Layer;
use crate::model::{LevelGraph, Node, Rect};
use crate::resolve::{layer_of_node, nodes_of_layer, position_in_layer, sort_layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelativeKind {
    /// `target` follows `node` inside the layer.
    InLayerSuccOf,
    /// `target` precedes `node` inside the layer.
    InLayerPredOf,
    /// No relative constraint applies; the drag should snap back.
    Undefined,
}

/// Outcome of [`determine_relative`]. For [`RelativeKind::Undefined`] both ids name the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeConstraint {
    pub kind: RelativeKind,
    pub node: String,
    pub target: String,
}

impl RelativeConstraint {
    pub fn undefined(target: &Node) -> Self {
        Self {
            kind: RelativeKind::Undefined,
            node: target.id.clone(),
            target: target.id.clone(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == RelativeKind::Undefined
    }
}

/// A node next to the candidate slot.
#[derive(Debug, Clone, Copy)]
enum Neighbor<'a> {
    Member(&'a Node),
    /// The target's own pre-drag slot.
    Origin,
}

impl Neighbor<'_> {
    fn rect(&self, target: &Node) -> Rect {
        match self {
            Neighbor::Member(n) => n.rect(),
            Neighbor::Origin => target.shadow_rect(),
        }
    }
}

/// Infers the in-layer constraint implied by `target`'s live position.
///
/// `g` is the target's hierarchy level and `layers` its bands (see [`crate::get_layers`]).
/// Equal gaps on both sides resolve to the predecessor, i.e. [`RelativeKind::InLayerSuccOf`].
pub fn determine_relative(g: &LevelGraph, layers: &[Layer], target: &Node) -> RelativeConstraint {
    let direction = target.direction;
    let nodes: Vec<&Node> = g.node_labels().collect();

    let layer = layer_of_node(target, &nodes, layers, direction);
    let members = sort_layer(&nodes_of_layer(layer, &nodes), direction);
    let position = position_in_layer(&members, target, direction);
    let is_member = members.iter().any(|n| n.id == target.id);

    let mut pred = position
        .checked_sub(1)
        .and_then(|ix| members.get(ix))
        .map(|n| Neighbor::Member(*n));
    let succ_ix = if is_member { position + 1 } else { position };
    let mut succ = members.get(succ_ix).map(|n| Neighbor::Member(*n));

    if layer == target.layer_id && position == target.pos_id {
        // Still in its original slot: the slot itself is the neighbour on the side the node came
        // from.
        let live = target.rect().cross_span(direction).0;
        let origin = target.shadow_rect().cross_span(direction).0;
        if live < origin {
            succ = Some(Neighbor::Origin);
        } else if live > origin {
            pred = Some(Neighbor::Origin);
        } else {
            trace!(node = %target.id, "node did not move across the layer");
            return RelativeConstraint::undefined(target);
        }
    }

    let target_mid = target.rect().cross_center(direction);
    let (kind, winner) = match (pred, succ) {
        (Some(p), Some(s)) => {
            let pred_gap = target_mid - p.rect(target).cross_span(direction).1;
            let succ_gap = s.rect(target).cross_span(direction).0 - target_mid;
            trace!(node = %target.id, pred_gap, succ_gap, "compared neighbour gaps");
            if pred_gap <= succ_gap {
                (RelativeKind::InLayerSuccOf, p)
            } else {
                (RelativeKind::InLayerPredOf, s)
            }
        }
        (Some(p), None) => (RelativeKind::InLayerSuccOf, p),
        (None, Some(s)) => (RelativeKind::InLayerPredOf, s),
        (None, None) => return RelativeConstraint::undefined(target),
    };

    let Neighbor::Member(neighbor) = winner else {
        trace!(node = %target.id, "closest slot is the node's own origin");
        return RelativeConstraint::undefined(target);
    };
    if neighbor.id == target.id {
        return RelativeConstraint::undefined(target);
    }
    if is_forbidden(g, &target.id, &neighbor.id) {
        debug!(node = %target.id, neighbor = %neighbor.id, "relative constraint vetoed: nodes are connected");
        return RelativeConstraint::undefined(target);
    }

    debug!(node = %target.id, neighbor = %neighbor.id, ?kind, layer, position, "inferred relative constraint");
    RelativeConstraint {
        kind,
        node: neighbor.id.clone(),
        target: target.id.clone(),
    }
}
