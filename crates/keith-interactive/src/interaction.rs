//! The drag-and-drop session of one diagram view.
//!
//! A session owns the working copy of the last snapshot. Dragging moves the node in that copy;
//! releasing it infers a constraint, writes it into the copy for immediate feedback and hands
//! back the action to send. The next snapshot from the server replaces the copy wholesale.

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::absolute::{AbsoluteConstraint, determine_absolute};
use crate::actions::{Action, absolute_action, relative_action};
use crate::config::{ConstraintMode, InteractiveOptions};
use crate::error::{Error, Result};
use crate::layers::{Layer, get_layers_padded};
use crate::model::{Node, Point};
use crate::relative::{RelativeConstraint, RelativeKind, determine_relative};
use crate::resolve::{layer_of_node, nodes_of_layer, position_in_layer, sort_layer};
use crate::snapshot::Diagram;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        node: String,
    },
    /// Released; the speculative constraint is applied until the next model arrives.
    Dropped {
        node: String,
    },
}

impl DragState {
    fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Dragging { .. } => "dragging",
            DragState::Dropped { .. } => "dropped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Inferred {
    Relative(RelativeConstraint),
    Absolute(AbsoluteConstraint),
}

impl Inferred {
    pub fn action(&self) -> Action {
        match self {
            Inferred::Relative(r) => relative_action(r),
            Inferred::Absolute(a) => absolute_action(a),
        }
    }

    /// Whether releasing here snaps the node back instead of setting a constraint.
    pub fn is_rejected(&self) -> bool {
        match self {
            Inferred::Relative(r) => r.is_undefined(),
            Inferred::Absolute(a) => matches!(
                a,
                AbsoluteConstraint::Forbidden { .. } | AbsoluteConstraint::Unchanged { .. }
            ),
        }
    }
}

/// What to show while the pointer moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub layers: Vec<Layer>,
    /// Raw candidate layer; `layers.len()` for a new trailing layer.
    pub layer: usize,
    /// Raw candidate index inside `layer`.
    pub position: usize,
    pub inferred: Inferred,
    pub forbidden: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    diagram: Diagram,
    options: InteractiveOptions,
    state: DragState,
}

impl DragSession {
    pub fn new(diagram: Diagram, options: InteractiveOptions) -> Self {
        Self {
            diagram,
            options,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn options(&self) -> &InteractiveOptions {
        &self.options
    }

    pub fn begin(&mut self, node_id: &str) -> Result<()> {
        if self.state != DragState::Idle {
            return Err(self.invalid("begin"));
        }
        let node = self
            .diagram
            .node_mut(node_id)
            .ok_or_else(|| Error::UnknownNode {
                id: node_id.to_string(),
            })?;
        node.selected = true;
        node.shadow = Some(node.position);
        trace!(node = node_id, x = node.position.x, y = node.position.y, "drag started");

        self.state = DragState::Dragging {
            node: node_id.to_string(),
        };
        Ok(())
    }

    /// Moves the dragged node to `to` and reports what releasing it there would do.
    pub fn pointer_move(&mut self, to: Point) -> Result<Feedback> {
        let id = self.dragged("move")?;
        if let Some(node) = self.diagram.node_mut(&id) {
            node.position = to;
        }
        self.feedback(&id)
    }

    /// Drops the dragged node where it is and returns the one action to send.
    pub fn release(&mut self) -> Result<Action> {
        let id = self.dragged("release")?;
        let _span = debug_span!("drop", node = %id).entered();

        let feedback = self.feedback(&id)?;
        let action = feedback.inferred.action();
        if let Some(node) = self.diagram.node_mut(&id) {
            apply_speculatively(node, &feedback.inferred);
        }

        debug!(kind = action.kind(), layer = feedback.layer, position = feedback.position, "drag released");
        self.state = DragState::Dropped { node: id };
        Ok(action)
    }

    /// Abandons the drag. A node still being dragged returns to where it started.
    pub fn cancel(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Err(self.invalid("cancel")),
            DragState::Dragging { node: id } => {
                if let Some(node) = self.diagram.node_mut(&id) {
                    snap_back(node);
                }
                trace!("drag cancelled");
                Ok(())
            }
            DragState::Dropped { .. } => Ok(()),
        }
    }

    /// Installs a fresh authoritative model. Any drag in progress is discarded.
    pub fn receive_model(&mut self, diagram: Diagram) {
        if let DragState::Dragging { node } = &self.state {
            debug!(node = %node, "model replaced during drag");
        }
        self.diagram = diagram;
        self.state = DragState::Idle;
    }

    fn dragged(&self, action: &'static str) -> Result<String> {
        match &self.state {
            DragState::Dragging { node } => Ok(node.clone()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    fn feedback(&self, id: &str) -> Result<Feedback> {
        let unknown = || Error::UnknownNode { id: id.to_string() };
        let level = self.diagram.level_of(id).ok_or_else(unknown)?;
        let target = level.graph.node(id).ok_or_else(unknown)?;
        let direction = target.direction;

        let nodes: Vec<&Node> = level.graph.node_labels().collect();
        let layers = get_layers_padded(&nodes, direction, self.options.single_layer_padding);
        let layer = layer_of_node(target, &nodes, &layers, direction);
        let members = sort_layer(&nodes_of_layer(layer, &nodes), direction);
        let position = position_in_layer(&members, target, direction);

        let inferred = match self.options.mode {
            ConstraintMode::Relative => {
                Inferred::Relative(determine_relative(&level.graph, &layers, target))
            }
            ConstraintMode::Absolute => {
                Inferred::Absolute(determine_absolute(&level.graph, &layers, target))
            }
        };
        let forbidden = inferred.is_rejected();
        Ok(Feedback {
            layers,
            layer,
            position,
            inferred,
            forbidden,
        })
    }
}

fn apply_speculatively(node: &mut Node, inferred: &Inferred) {
    match inferred {
        Inferred::Relative(r) => match r.kind {
            RelativeKind::InLayerSuccOf => node.il_succ_of = Some(r.node.clone()),
            RelativeKind::InLayerPredOf => node.il_pred_of = Some(r.node.clone()),
            RelativeKind::Undefined => return snap_back(node),
        },
        Inferred::Absolute(a) => match a {
            AbsoluteConstraint::Layer { layer, .. } => node.layer_cons = Some(*layer),
            AbsoluteConstraint::Position { position, .. } => node.pos_cons = Some(*position),
            AbsoluteConstraint::Static {
                layer, position, ..
            } => {
                node.layer_cons = Some(*layer);
                node.pos_cons = Some(*position);
            }
            AbsoluteConstraint::Forbidden { .. } | AbsoluteConstraint::Unchanged { .. } => {
                return snap_back(node);
            }
        },
    }
    node.selected = false;
    node.shadow = None;
}

fn snap_back(node: &mut Node) {
    if let Some(shadow) = node.shadow.take() {
        node.position = shadow;
    }
    node.selected = false;
}
