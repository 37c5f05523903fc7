use keith_interactive::actions::{InLayerConstraint, LayerConstraint, PositionConstraint};
use keith_interactive::{Action, RelativeConstraint, RelativeKind, relative_action};
use serde_json::json;

#[test]
fn relative_results_map_to_in_layer_actions() {
    let succ = RelativeConstraint {
        kind: RelativeKind::InLayerSuccOf,
        node: "top".to_string(),
        target: "mid".to_string(),
    };
    let action = relative_action(&succ);
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({
            "kind": "setILSuccOfConstraint",
            "constraint": { "id": "mid", "otherNode": "top" }
        })
    );
    assert_eq!(action.node_id(), Some("mid"));

    let pred = RelativeConstraint {
        kind: RelativeKind::InLayerPredOf,
        ..succ
    };
    assert_eq!(relative_action(&pred).kind(), "setILPredOfConstraint");
}

#[test]
fn refresh_has_no_payload_and_no_server_method() {
    let action = Action::RefreshDiagram;
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({ "kind": "refreshDiagram" })
    );
    assert_eq!(action.method(), None);
    assert_eq!(action.node_id(), None);
}

#[test]
fn absolute_actions_carry_their_indices() {
    let layer = Action::SetLayerConstraint {
        constraint: LayerConstraint {
            id: "a".to_string(),
            layer: 2,
        },
    };
    assert_eq!(
        serde_json::to_value(&layer).unwrap(),
        json!({ "kind": "setLayerConstraint", "constraint": { "id": "a", "layer": 2 } })
    );

    let position = Action::SetPositionConstraint {
        constraint: PositionConstraint {
            id: "a".to_string(),
            position: 0,
        },
    };
    assert_eq!(
        position.method().as_deref(),
        Some("keith/constraints/setPositionConstraint")
    );
}

#[test]
fn delete_actions_only_name_the_node() {
    let cases = [
        (Action::delete_layer_constraint("n"), "deleteLayerConstraint"),
        (Action::delete_position_constraint("n"), "deletePositionConstraint"),
        (Action::delete_static_constraint("n"), "deleteStaticConstraint"),
        (Action::delete_relative_constraints("n"), "deleteRelativeConstraints"),
    ];
    for (action, kind) in cases {
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({ "kind": kind, "constraint": { "id": "n" } })
        );
        assert_eq!(action.kind(), kind);
    }
}

#[test]
fn actions_parse_back_from_the_wire() {
    let action: Action = serde_json::from_value(json!({
        "kind": "setILPredOfConstraint",
        "constraint": { "id": "x", "otherNode": "y" }
    }))
    .unwrap();
    assert_eq!(
        action,
        Action::SetInLayerPredOf {
            constraint: InLayerConstraint {
                id: "x".to_string(),
                other_node: "y".to_string(),
            }
        }
    );
}
