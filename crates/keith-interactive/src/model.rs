//! Nodes, edges and geometry primitives of one hierarchy level.
//!
//! Coordinates are diagram coordinates (x grows right, y grows down). The layer code works in
//! *flow* coordinates instead: the flow axis is the axis along which layers follow each other,
//! oriented so that it always grows in layout direction. [`Rect::flow_span`] and
//! [`Rect::cross_span`] convert between the two.

use serde::{Deserialize, Serialize};

use crate::graphlib::Graph;

/// The graph of a single hierarchy level: the nodes sharing one parent and the edges between them.
pub type LevelGraph = Graph<Node, EdgeLabel>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Start and end of the rectangle along the flow axis of `direction`.
    pub fn flow_span(&self, direction: Direction) -> (f64, f64) {
        match direction {
            Direction::Undefined | Direction::Right => (self.x, self.x + self.width),
            Direction::Left => (-(self.x + self.width), -self.x),
            Direction::Down => (self.y, self.y + self.height),
            Direction::Up => (-(self.y + self.height), -self.y),
        }
    }

    pub fn flow_center(&self, direction: Direction) -> f64 {
        let (start, end) = self.flow_span(direction);
        start + (end - start) / 2.0
    }

    /// Start and end of the rectangle across the flow axis. The cross axis is never mirrored.
    pub fn cross_span(&self, direction: Direction) -> (f64, f64) {
        if direction.is_vertical() {
            (self.x, self.x + self.width)
        } else {
            (self.y, self.y + self.height)
        }
    }

    pub fn cross_center(&self, direction: Direction) -> f64 {
        let (start, end) = self.cross_span(direction);
        start + (end - start) / 2.0
    }
}

/// Global flow direction of a layered layout.
///
/// On the wire this is the numeric value of the KLighD `Direction` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Direction {
    #[default]
    Undefined,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Layers are stacked vertically (UP/DOWN); nodes inside a layer are ordered by x.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        match value {
            1 => Direction::Left,
            2 => Direction::Right,
            3 => Direction::Up,
            4 => Direction::Down,
            _ => Direction::Undefined,
        }
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Undefined => 0,
            Direction::Left => 1,
            Direction::Right => 2,
            Direction::Up => 3,
            Direction::Down => 4,
        }
    }
}

/// A diagram node annotated with the layered layout's bookkeeping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub id: String,
    pub position: Point,
    pub size: Size,
    pub selected: bool,
    /// Position before the current drag started.
    pub shadow: Option<Point>,
    pub direction: Direction,
    pub layer_id: usize,
    pub layer_cons: Option<usize>,
    pub pos_id: usize,
    pub pos_cons: Option<usize>,
    pub il_pred_of: Option<String>,
    pub il_succ_of: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            position,
            size,
            ..Default::default()
        }
    }

    pub fn in_layer(mut self, layer_id: usize, pos_id: usize) -> Self {
        self.layer_id = layer_id;
        self.pos_id = pos_id;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_layer_cons(mut self, layer_cons: usize) -> Self {
        self.layer_cons = Some(layer_cons);
        self
    }

    pub fn with_pos_cons(mut self, pos_cons: usize) -> Self {
        self.pos_cons = Some(pos_cons);
        self
    }

    /// Marks the node as dragged from `shadow` to its current position.
    pub fn dragged_from(mut self, shadow: Point) -> Self {
        self.selected = true;
        self.shadow = Some(shadow);
        self
    }

    /// Live bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Bounds before the drag, or the live bounds when there is no shadow.
    pub fn shadow_rect(&self) -> Rect {
        Rect::new(self.shadow.unwrap_or(self.position), self.size)
    }

    /// Bounds that define the node's layer band. A node being dragged keeps contributing its
    /// pre-drag geometry so the bands do not follow the pointer.
    pub fn layout_rect(&self) -> Rect {
        match self.shadow {
            Some(_) if self.selected => self.shadow_rect(),
            _ => self.rect(),
        }
    }

    pub fn has_relative_constraint(&self) -> bool {
        self.il_pred_of.is_some() || self.il_succ_of.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeLabel {
    pub id: String,
    /// Set by [`crate::cycles::mark_cycle_inducing`]; only meaningful for the snapshot it was
    /// computed on.
    pub cycle_inducing: bool,
}

impl EdgeLabel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cycle_inducing: false,
        }
    }
}

/// Builds a level graph from nodes and `(edge id, source, target)` triples.
pub fn level_graph<'a>(
    nodes: impl IntoIterator<Item = Node>,
    edges: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
) -> LevelGraph {
    let mut g = LevelGraph::default();
    for n in nodes {
        g.set_node(n.id.clone(), n);
    }
    for (id, v, w) in edges {
        g.set_edge_named(v, w, Some(id), Some(EdgeLabel::new(id)));
    }
    g
}
