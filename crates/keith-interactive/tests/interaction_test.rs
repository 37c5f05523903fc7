use keith_interactive::actions::{InLayerConstraint, PositionConstraint};
use keith_interactive::{
    Action, ConstraintMode, Diagram, DragSession, DragState, Error, Inferred, InteractiveOptions,
    Point, RelativeKind,
};
use serde_json::json;

fn column() -> Diagram {
    let node = |id: &str, y: f64, pos: usize| {
        json!({
            "type": "node",
            "id": id,
            "position": { "x": 0.0, "y": y },
            "size": { "width": 20.0, "height": 20.0 },
            "direction": 2,
            "layerId": 0,
            "layerCons": -1,
            "posId": pos,
            "posCons": -1
        })
    };
    let snapshot = json!({
        "children": [node("top", 0.0, 0), node("mid", 50.0, 1), node("bot", 100.0, 2)]
    });
    Diagram::from_json(&snapshot.to_string()).unwrap()
}

fn two_layers() -> Diagram {
    let snapshot = json!({
        "children": [
            {
                "type": "node",
                "id": "a",
                "position": { "x": 0.0, "y": 0.0 },
                "size": { "width": 20.0, "height": 20.0 },
                "direction": 2,
                "layerId": 0,
                "posId": 0
            },
            {
                "type": "node",
                "id": "b",
                "position": { "x": 100.0, "y": 0.0 },
                "size": { "width": 20.0, "height": 20.0 },
                "direction": 2,
                "layerId": 1,
                "posId": 0
            }
        ]
    });
    Diagram::from_json(&snapshot.to_string()).unwrap()
}

#[test]
fn relative_drag_proposes_and_applies_an_in_layer_constraint() {
    let mut session = DragSession::new(column(), InteractiveOptions::relative());
    assert_eq!(session.options().mode, ConstraintMode::Relative);
    session.begin("mid").unwrap();

    let feedback = session.pointer_move(Point::new(0.0, 5.0)).unwrap();
    assert_eq!(feedback.layers.len(), 1);
    assert_eq!((feedback.layer, feedback.position), (0, 1));
    assert!(!feedback.forbidden);
    let Inferred::Relative(relative) = &feedback.inferred else {
        panic!("expected a relative result, got {:?}", feedback.inferred);
    };
    assert_eq!(relative.kind, RelativeKind::InLayerSuccOf);

    let action = session.release().unwrap();
    assert_eq!(
        action,
        Action::SetInLayerSuccOf {
            constraint: InLayerConstraint {
                id: "mid".to_string(),
                other_node: "top".to_string(),
            }
        }
    );
    assert_eq!(
        session.state(),
        &DragState::Dropped {
            node: "mid".to_string()
        }
    );

    let mid = session.diagram().node("mid").unwrap();
    assert_eq!(mid.il_succ_of.as_deref(), Some("top"));
    assert_eq!(mid.position, Point::new(0.0, 5.0));
    assert!(!mid.selected);
    assert_eq!(mid.shadow, None);
}

#[test]
fn absolute_drag_pins_the_new_position() {
    let mut session = DragSession::new(column(), InteractiveOptions::default());
    session.begin("mid").unwrap();
    session.pointer_move(Point::new(0.0, -10.0)).unwrap();

    let action = session.release().unwrap();
    assert_eq!(
        action,
        Action::SetPositionConstraint {
            constraint: PositionConstraint {
                id: "mid".to_string(),
                position: 0,
            }
        }
    );
    assert_eq!(session.diagram().node("mid").unwrap().pos_cons, Some(0));
}

#[test]
fn release_without_movement_snaps_back() {
    let mut session = DragSession::new(column(), InteractiveOptions::relative());
    session.begin("mid").unwrap();

    assert_eq!(session.release().unwrap(), Action::RefreshDiagram);
    let mid = session.diagram().node("mid").unwrap();
    assert_eq!(mid.position, Point::new(0.0, 50.0));
    assert_eq!(mid.shadow, None);
    assert!(!mid.has_relative_constraint());
}

#[test]
fn absolute_release_in_the_original_slot_snaps_back() {
    let mut session = DragSession::new(column(), InteractiveOptions::default());
    session.begin("mid").unwrap();
    assert_eq!(session.release().unwrap(), Action::RefreshDiagram);
    session.receive_model(column());

    session.begin("mid").unwrap();
    let feedback = session.pointer_move(Point::new(2.0, 52.0)).unwrap();
    assert!(feedback.forbidden);
    assert_eq!(session.release().unwrap(), Action::RefreshDiagram);

    let mid = session.diagram().node("mid").unwrap();
    assert_eq!(mid.position, Point::new(0.0, 50.0));
    assert_eq!(mid.pos_cons, None);
    assert_eq!(mid.layer_cons, None);
    assert!(!mid.selected);
}

#[test]
fn nudging_a_lone_node_inside_its_layer_snaps_back() {
    let mut session = DragSession::new(two_layers(), InteractiveOptions::default());
    session.begin("b").unwrap();
    let feedback = session.pointer_move(Point::new(104.0, 3.0)).unwrap();
    assert_eq!((feedback.layer, feedback.position), (1, 0));

    assert_eq!(session.release().unwrap(), Action::RefreshDiagram);
    let b = session.diagram().node("b").unwrap();
    assert_eq!(b.position, Point::new(100.0, 0.0));
    assert_eq!(b.layer_cons, None);
}

#[test]
fn cancel_restores_the_pre_drag_position() {
    let mut session = DragSession::new(column(), InteractiveOptions::default());
    session.begin("bot").unwrap();
    session.pointer_move(Point::new(300.0, 7.0)).unwrap();
    session.cancel().unwrap();

    assert_eq!(session.state(), &DragState::Idle);
    let bot = session.diagram().node("bot").unwrap();
    assert_eq!(bot.position, Point::new(0.0, 100.0));
    assert!(!bot.selected);
}

#[test]
fn illegal_transitions_are_reported() {
    let mut session = DragSession::new(column(), InteractiveOptions::default());

    let err = session.pointer_move(Point::new(0.0, 0.0)).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTransition {
            action: "move",
            state: "idle"
        }
    ));
    assert!(matches!(session.release(), Err(Error::InvalidTransition { .. })));
    assert!(matches!(session.cancel(), Err(Error::InvalidTransition { .. })));
    assert!(matches!(
        session.begin("ghost"),
        Err(Error::UnknownNode { id }) if id == "ghost"
    ));

    session.begin("top").unwrap();
    assert!(matches!(
        session.begin("mid"),
        Err(Error::InvalidTransition {
            action: "begin",
            state: "dragging"
        })
    ));

    session.release().unwrap();
    assert!(matches!(
        session.release(),
        Err(Error::InvalidTransition {
            state: "dropped",
            ..
        })
    ));
}

#[test]
fn a_new_model_ends_the_interaction() {
    let mut session = DragSession::new(column(), InteractiveOptions::relative());
    session.begin("mid").unwrap();
    session.pointer_move(Point::new(0.0, 5.0)).unwrap();
    session.release().unwrap();

    session.receive_model(column());
    assert_eq!(session.state(), &DragState::Idle);
    assert_eq!(session.diagram().node("mid").unwrap().il_succ_of, None);

    session.begin("mid").unwrap();
    session.receive_model(column());
    assert_eq!(session.state(), &DragState::Idle);
    assert!(!session.diagram().node("mid").unwrap().selected);
}
