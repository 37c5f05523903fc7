#![forbid(unsafe_code)]

//! Interactive layout constraints for layered KEITH diagrams.
//!
//! When a node of a laid-out layered graph is dragged and dropped, this crate works out which
//! constraint the user meant: a layer or in-layer position (absolute), or an ordering relative to
//! an in-layer neighbour. The result is a sprotty-style [`Action`] for the language server, which
//! then lays the graph out again and pushes a new snapshot.
//!
//! All inference functions are pure and work on one hierarchy level ([`LevelGraph`]); layer bands
//! are recomputed from node geometry on every call. [`DragSession`] ties them into the
//! drag/drop/model-update cycle of a diagram view.

pub use keith_graphlib as graphlib;

pub mod absolute;
pub mod actions;
pub mod config;
pub mod conflict;
pub mod cycles;
pub mod error;
pub mod interaction;
pub mod layers;
pub mod model;
pub mod relative;
pub mod resolve;
pub mod snapshot;

pub use absolute::{AbsoluteConstraint, actual_layer, actual_target_index, determine_absolute};
pub use actions::{Action, absolute_action, relative_action};
pub use config::{ConstraintMode, InteractiveOptions};
pub use conflict::{is_forbidden, is_layer_forbidden};
pub use cycles::mark_cycle_inducing;
pub use error::{Error, Result};
pub use interaction::{DragSession, DragState, Feedback, Inferred};
pub use layers::{Layer, get_layers, get_layers_padded};
pub use model::{Direction, EdgeLabel, LevelGraph, Node, Point, Rect, Size, level_graph};
pub use relative::{RelativeConstraint, RelativeKind, determine_relative};
pub use resolve::{layer_of_node, nodes_of_layer, position_in_layer, sort_layer};
pub use snapshot::{Diagram, Element, GraphSnapshot, Level};
