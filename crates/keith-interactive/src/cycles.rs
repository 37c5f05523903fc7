//! Cycle-inducing edges.
//!
//! An edge is cycle inducing when it lies on a directed cycle and runs against the layer order,
//! i.e. it is one of the edges the layering had to reverse.

use rustc_hash::FxHashMap as HashMap;

use crate::graphlib::alg;
use crate::model::LevelGraph;

/// Recomputes `cycle_inducing` on every edge of `g` and returns how many are set.
pub fn mark_cycle_inducing(g: &mut LevelGraph) -> usize {
    let cycle_of: HashMap<String, usize> = alg::find_cycles(g)
        .into_iter()
        .enumerate()
        .flat_map(|(ix, cycle)| cycle.into_iter().map(move |v| (v, ix)))
        .collect();
    let layer_of: HashMap<String, usize> = g
        .nodes()
        .zip(g.node_labels())
        .map(|(id, n)| (id.to_string(), n.layer_id))
        .collect();

    let mut count = 0;
    g.for_each_edge_mut(|key, label| {
        let on_cycle = match (cycle_of.get(&key.v), cycle_of.get(&key.w)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        let backwards = layer_of.get(&key.v) >= layer_of.get(&key.w);
        label.cycle_inducing = on_cycle && backwards;
        if label.cycle_inducing {
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Point, Size, level_graph};

    fn node(id: &str, layer: usize) -> Node {
        Node::new(id, Point::default(), Size::new(10.0, 10.0)).in_layer(layer, 0)
    }

    #[test]
    fn only_the_backward_edge_of_a_cycle_is_marked() {
        let mut g = level_graph(
            [node("a", 0), node("b", 1), node("c", 2), node("d", 3)],
            [
                ("ab", "a", "b"),
                ("bc", "b", "c"),
                ("ca", "c", "a"),
                ("cd", "c", "d"),
            ],
        );

        assert_eq!(mark_cycle_inducing(&mut g), 1);
        assert_eq!(g.edge("c", "a", Some("ca")).map(|e| e.cycle_inducing), Some(true));
        assert_eq!(g.edge("a", "b", Some("ab")).map(|e| e.cycle_inducing), Some(false));
        assert_eq!(g.edge("c", "d", Some("cd")).map(|e| e.cycle_inducing), Some(false));
    }

    #[test]
    fn self_loops_are_cycle_inducing() {
        let mut g = level_graph([node("a", 0)], [("aa", "a", "a")]);
        assert_eq!(mark_cycle_inducing(&mut g), 1);
    }
}
