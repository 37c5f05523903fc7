//! Outbound constraint actions.
//!
//! This is where an inferred constraint turns into a protocol message. Actions serialize as
//! sprotty-style actions: `{"kind": "...", "constraint": {...}}`.

use serde::{Deserialize, Serialize};

use crate::absolute::AbsoluteConstraint;
use crate::relative::{RelativeConstraint, RelativeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConstraint {
    pub id: String,
    pub layer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionConstraint {
    pub id: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConstraint {
    pub id: String,
    pub layer: usize,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InLayerConstraint {
    pub id: String,
    pub other_node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Action {
    SetLayerConstraint {
        constraint: LayerConstraint,
    },
    SetPositionConstraint {
        constraint: PositionConstraint,
    },
    SetStaticConstraint {
        constraint: StaticConstraint,
    },
    DeleteLayerConstraint {
        constraint: NodeRef,
    },
    DeletePositionConstraint {
        constraint: NodeRef,
    },
    DeleteStaticConstraint {
        constraint: NodeRef,
    },
    #[serde(rename = "setILPredOfConstraint")]
    SetInLayerPredOf {
        constraint: InLayerConstraint,
    },
    #[serde(rename = "setILSuccOfConstraint")]
    SetInLayerSuccOf {
        constraint: InLayerConstraint,
    },
    DeleteRelativeConstraints {
        constraint: NodeRef,
    },
    /// Discard the speculative move and redraw from the last authoritative model.
    RefreshDiagram,
}

impl Action {
    pub fn delete_layer_constraint(id: impl Into<String>) -> Self {
        Action::DeleteLayerConstraint {
            constraint: NodeRef { id: id.into() },
        }
    }

    pub fn delete_position_constraint(id: impl Into<String>) -> Self {
        Action::DeletePositionConstraint {
            constraint: NodeRef { id: id.into() },
        }
    }

    pub fn delete_static_constraint(id: impl Into<String>) -> Self {
        Action::DeleteStaticConstraint {
            constraint: NodeRef { id: id.into() },
        }
    }

    pub fn delete_relative_constraints(id: impl Into<String>) -> Self {
        Action::DeleteRelativeConstraints {
            constraint: NodeRef { id: id.into() },
        }
    }

    /// The action's `kind` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetLayerConstraint { .. } => "setLayerConstraint",
            Action::SetPositionConstraint { .. } => "setPositionConstraint",
            Action::SetStaticConstraint { .. } => "setStaticConstraint",
            Action::DeleteLayerConstraint { .. } => "deleteLayerConstraint",
            Action::DeletePositionConstraint { .. } => "deletePositionConstraint",
            Action::DeleteStaticConstraint { .. } => "deleteStaticConstraint",
            Action::SetInLayerPredOf { .. } => "setILPredOfConstraint",
            Action::SetInLayerSuccOf { .. } => "setILSuccOfConstraint",
            Action::DeleteRelativeConstraints { .. } => "deleteRelativeConstraints",
            Action::RefreshDiagram => "refreshDiagram",
        }
    }

    /// Language-server notification carrying this action, or `None` for the local refresh.
    pub fn method(&self) -> Option<String> {
        match self {
            Action::RefreshDiagram => None,
            other => Some(format!("keith/constraints/{}", other.kind())),
        }
    }

    /// Id of the node the action is about.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Action::SetLayerConstraint { constraint } => Some(&constraint.id),
            Action::SetPositionConstraint { constraint } => Some(&constraint.id),
            Action::SetStaticConstraint { constraint } => Some(&constraint.id),
            Action::SetInLayerPredOf { constraint } | Action::SetInLayerSuccOf { constraint } => {
                Some(&constraint.id)
            }
            Action::DeleteLayerConstraint { constraint }
            | Action::DeletePositionConstraint { constraint }
            | Action::DeleteStaticConstraint { constraint }
            | Action::DeleteRelativeConstraints { constraint } => Some(&constraint.id),
            Action::RefreshDiagram => None,
        }
    }
}

/// Maps a relative inference result to its action. `Undefined` becomes a refresh.
pub fn relative_action(result: &RelativeConstraint) -> Action {
    let constraint = InLayerConstraint {
        id: result.target.clone(),
        other_node: result.node.clone(),
    };
    match result.kind {
        RelativeKind::InLayerSuccOf => Action::SetInLayerSuccOf { constraint },
        RelativeKind::InLayerPredOf => Action::SetInLayerPredOf { constraint },
        RelativeKind::Undefined => Action::RefreshDiagram,
    }
}

/// Maps an absolute inference result to its action. `Forbidden` and `Unchanged` become a refresh.
pub fn absolute_action(result: &AbsoluteConstraint) -> Action {
    match result {
        AbsoluteConstraint::Layer { target, layer } => Action::SetLayerConstraint {
            constraint: LayerConstraint {
                id: target.clone(),
                layer: *layer,
            },
        },
        AbsoluteConstraint::Position { target, position } => Action::SetPositionConstraint {
            constraint: PositionConstraint {
                id: target.clone(),
                position: *position,
            },
        },
        AbsoluteConstraint::Static {
            target,
            layer,
            position,
        } => Action::SetStaticConstraint {
            constraint: StaticConstraint {
                id: target.clone(),
                layer: *layer,
                position: *position,
            },
        },
        AbsoluteConstraint::Forbidden { .. } | AbsoluteConstraint::Unchanged { .. } => {
            Action::RefreshDiagram
        }
    }
}
