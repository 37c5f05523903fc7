//! Adjacency cache used by [`Graph`](super::Graph).
//!
//! Conflict checks ask for the incident edges of a node once per drag event. The cache turns
//! that from a scan over every edge into a slice lookup.

#[derive(Debug, Clone)]
pub(in crate::graph) struct DirectedAdjCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) out: Vec<Vec<usize>>,
    pub(in crate::graph) in_: Vec<Vec<usize>>,
}

impl DirectedAdjCache {
    pub(in crate::graph) fn build(
        generation: u64,
        node_count: usize,
        endpoints: impl Iterator<Item = (usize, usize)>,
    ) -> Self {
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut in_: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (edge_ix, (v_ix, w_ix)) in endpoints.enumerate() {
            out[v_ix].push(edge_ix);
            in_[w_ix].push(edge_ix);
        }
        Self {
            generation,
            out,
            in_,
        }
    }

    pub(in crate::graph) fn out_edges(&self, v_ix: usize) -> &[usize] {
        &self.out[v_ix]
    }

    pub(in crate::graph) fn in_edges(&self, v_ix: usize) -> &[usize] {
        &self.in_[v_ix]
    }
}
