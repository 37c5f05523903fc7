//! Layer bands of a layered layout.
//!
//! Layers are derived from node geometry on every query and never stored across interactions.

use serde::Serialize;

use crate::config::DEFAULT_SINGLE_LAYER_PADDING;
use crate::model::{Direction, Node, Rect};

/// A band along the flow axis holding the nodes of one layer.
///
/// `left_x`, `right_x` and `mid_x` are flow coordinates (see [`Rect::flow_span`]); `top_y` and
/// `bot_y` are the cross-axis extent of the whole level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub left_x: f64,
    pub right_x: f64,
    pub mid_x: f64,
    pub top_y: f64,
    pub bot_y: f64,
    pub direction: Direction,
}

impl Layer {
    pub fn contains(&self, flow: f64) -> bool {
        self.left_x <= flow && flow < self.right_x
    }

    /// The band in diagram coordinates, e.g. for highlighting it.
    pub fn to_rect(&self) -> Rect {
        let flow_len = self.right_x - self.left_x;
        let cross_len = self.bot_y - self.top_y;
        match self.direction {
            Direction::Undefined | Direction::Right => Rect {
                x: self.left_x,
                y: self.top_y,
                width: flow_len,
                height: cross_len,
            },
            Direction::Left => Rect {
                x: -self.right_x,
                y: self.top_y,
                width: flow_len,
                height: cross_len,
            },
            Direction::Down => Rect {
                x: self.top_y,
                y: self.left_x,
                width: cross_len,
                height: flow_len,
            },
            Direction::Up => Rect {
                x: self.top_y,
                y: -self.right_x,
                width: cross_len,
                height: flow_len,
            },
        }
    }
}

/// Computes the layer bands with the default single-layer padding.
pub fn get_layers(nodes: &[&Node], direction: Direction) -> Vec<Layer> {
    get_layers_padded(nodes, direction, DEFAULT_SINGLE_LAYER_PADDING)
}

/// Computes one band per layer index `0..=max(layer_id)`.
///
/// Adjacent bands meet halfway between their contents. The outer bounds of the first and last
/// band mirror their inner bound around the content midpoint. A lone layer is widened by
/// `padding` on both sides instead. An index without members collapses to an empty band at the
/// previous boundary.
pub fn get_layers_padded(nodes: &[&Node], direction: Direction, padding: f64) -> Vec<Layer> {
    let Some(last_layer) = nodes.iter().map(|n| n.layer_id).max() else {
        return Vec::new();
    };

    let mut bounds: Vec<(f64, f64)> = vec![(f64::INFINITY, f64::NEG_INFINITY); last_layer + 1];
    let mut top_y = f64::INFINITY;
    let mut bot_y = f64::NEG_INFINITY;
    for n in nodes {
        let rect = n.layout_rect();
        let (start, end) = rect.flow_span(direction);
        let (cross_start, cross_end) = rect.cross_span(direction);
        let band = &mut bounds[n.layer_id];
        band.0 = band.0.min(start);
        band.1 = band.1.max(end);
        top_y = top_y.min(cross_start);
        bot_y = bot_y.max(cross_end);
    }

    let mut layers: Vec<Layer> = bounds
        .iter()
        .map(|&(left_x, right_x)| Layer {
            left_x,
            right_x,
            mid_x: left_x + (right_x - left_x) / 2.0,
            top_y,
            bot_y,
            direction,
        })
        .collect();
    let occupied: Vec<usize> = (0..bounds.len())
        .filter(|&i| bounds[i].0 <= bounds[i].1)
        .collect();

    for pair in occupied.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let prev_right = layers[prev].right_x;
        let mid = prev_right + (layers[next].left_x - prev_right) / 2.0;
        layers[prev].right_x = mid;
        layers[next].left_x = mid;
    }

    match occupied.as_slice() {
        [] => {}
        [only] => {
            let only = &mut layers[*only];
            only.left_x -= padding;
            only.right_x += padding;
        }
        [first, .., last] => {
            let first = &mut layers[*first];
            first.left_x = first.mid_x - (first.right_x - first.mid_x);
            let last = &mut layers[*last];
            last.right_x = last.mid_x + (last.mid_x - last.left_x);
        }
    }

    // Unoccupied indices become empty bands sitting on the boundary of the band before them.
    let mut edge = occupied.first().map(|&i| layers[i].left_x).unwrap_or(0.0);
    for (i, layer) in layers.iter_mut().enumerate() {
        if bounds[i].0 <= bounds[i].1 {
            edge = layer.right_x;
        } else {
            layer.left_x = edge;
            layer.right_x = edge;
            layer.mid_x = edge;
        }
    }

    layers
}
