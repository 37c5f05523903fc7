//! Helper algorithms over [`Graph`](super::Graph).

use super::Graph;
use std::collections::{BTreeMap, BTreeSet};

/// Strongly connected components (Tarjan), each listed in node insertion order.
///
/// Components come out in the order Tarjan closes them, i.e. sinks first.
pub fn strongly_connected_components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
{
    struct Tarjan<'a, N, E>
    where
        N: Default + 'static,
        E: Default + 'static,
    {
        g: &'a Graph<N, E>,
        index: usize,
        stack: Vec<String>,
        on_stack: BTreeSet<String>,
        indices: BTreeMap<String, usize>,
        lowlink: BTreeMap<String, usize>,
        sccs: Vec<Vec<String>>,
    }

    impl<N, E> Tarjan<'_, N, E>
    where
        N: Default + 'static,
        E: Default + 'static,
    {
        fn strongconnect(&mut self, v: &str) {
            self.indices.insert(v.to_string(), self.index);
            self.lowlink.insert(v.to_string(), self.index);
            self.index += 1;
            self.stack.push(v.to_string());
            self.on_stack.insert(v.to_string());

            for w in self.g.successors(v) {
                if !self.indices.contains_key(w) {
                    self.strongconnect(w);
                    let (Some(v_low), Some(w_low)) =
                        (self.lowlink.get(v).copied(), self.lowlink.get(w).copied())
                    else {
                        debug_assert!(false, "tarjan lowlink missing");
                        continue;
                    };
                    self.lowlink.insert(v.to_string(), v_low.min(w_low));
                } else if self.on_stack.contains(w) {
                    let (Some(v_low), Some(w_idx)) =
                        (self.lowlink.get(v).copied(), self.indices.get(w).copied())
                    else {
                        debug_assert!(false, "tarjan index missing");
                        continue;
                    };
                    self.lowlink.insert(v.to_string(), v_low.min(w_idx));
                }
            }

            if self.lowlink.get(v) == self.indices.get(v) {
                let mut scc: Vec<String> = Vec::new();
                loop {
                    let Some(w) = self.stack.pop() else {
                        debug_assert!(false, "tarjan stack underflow");
                        break;
                    };
                    self.on_stack.remove(&w);
                    let done = w == v;
                    scc.push(w);
                    if done {
                        break;
                    }
                }
                self.sccs.push(scc);
            }
        }
    }

    let node_ids = g.node_ids();
    let mut tarjan = Tarjan {
        g,
        index: 0,
        stack: Vec::new(),
        on_stack: BTreeSet::new(),
        indices: BTreeMap::new(),
        lowlink: BTreeMap::new(),
        sccs: Vec::new(),
    };

    for v in &node_ids {
        if !tarjan.indices.contains_key(v) {
            tarjan.strongconnect(v);
        }
    }

    let order: BTreeMap<&str, usize> = node_ids
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();
    let mut sccs = tarjan.sccs;
    for scc in &mut sccs {
        scc.sort_by_key(|v| order.get(v.as_str()).copied().unwrap_or(usize::MAX));
    }
    sccs
}

/// Components that contain a cycle: every SCC with more than one node, plus self-loops.
pub fn find_cycles<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
{
    let mut cycles: Vec<Vec<String>> = strongly_connected_components(g)
        .into_iter()
        .filter(|scc| match scc.as_slice() {
            [v] => !g.out_edges(v, Some(v)).is_empty(),
            _ => true,
        })
        .collect();
    cycles.sort_by(|a, b| a.first().cmp(&b.first()));
    cycles
}
