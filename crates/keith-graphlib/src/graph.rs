//! Graph container APIs used by `keith-interactive`.
//!
//! This module contains the core `Graph` container plus a small set of helper algorithms
//! re-exported as `keith_graphlib::alg`.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

mod adj_cache;
pub mod alg;
mod edge_key;
mod entries;

use adj_cache::DirectedAdjCache;
use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};

pub use edge_key::EdgeKey;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

pub struct Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Interior mutability keeps the adjacency queries on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<DirectedAdjCache>>,
}

impl<N, E> Clone for Graph<N, E>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            adj_gen: self.adj_gen,
            adj_cache: RefCell::new(None),
        }
    }
}

impl<N, E> std::fmt::Debug for Graph<N, E>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .finish()
    }
}

impl<N, E> Default for Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn ensure_adj(&self) -> std::cell::Ref<'_, DirectedAdjCache> {
        let generation = self.adj_gen;
        let stale = self
            .adj_cache
            .borrow()
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            let cache = DirectedAdjCache::build(
                generation,
                self.nodes.len(),
                self.edges.iter().map(|e| (e.v_ix, e.w_ix)),
            );
            *self.adj_cache.borrow_mut() = Some(cache);
        }
        std::cell::Ref::map(self.adj_cache.borrow(), |c| {
            c.as_ref()
                .expect("adjacency cache should be present after ensure")
        })
    }

    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    fn ensure_node(&mut self, id: String) -> usize {
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.set_node(id, N::default());
        idx
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Node labels in insertion order.
    pub fn node_labels(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().map(|n| &n.label)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in &mut self.edges {
            f(&e.key, &mut e.label);
        }
    }

    /// Inserts or relabels an edge. Parallel edges are told apart by `name`; missing endpoints
    /// are created with a default label.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let v = v.into();
        let w = w.into();
        let name: Option<String> = name.map(Into::into);

        let view = EdgeKeyView {
            v: v.as_str(),
            w: w.as_str(),
            name: name.as_deref(),
        };
        if let Some(&idx) = self.edge_index.get(&view) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        let v_ix = self.ensure_node(v.clone());
        let w_ix = self.ensure_node(w.clone());
        self.invalidate_adj();

        let key = EdgeKey { v, w, name };
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            v_ix,
            w_ix,
            label: label.unwrap_or_default(),
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&EdgeKeyView { v, w, name })
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edge_index
            .get(&EdgeKeyView { v, w, name })
            .map(|&idx| &self.edges[idx].label)
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_ix)
            .iter()
            .map(|&edge_ix| self.edges[edge_ix].key.w.as_str())
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .in_edges(v_ix)
            .iter()
            .map(|&edge_ix| self.edges[edge_ix].key.v.as_str())
            .collect()
    }

    /// Successors followed by predecessors, without duplicates.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for w in self.successors(v) {
            if !out.iter().any(|x| x == &w) {
                out.push(w);
            }
        }
        for u in self.predecessors(v) {
            if !out.iter().any(|x| x == &u) {
                out.push(u);
            }
        }
        out
    }

    /// Whether an edge runs between `v` and `w` in either direction.
    pub fn is_adjacent(&self, v: &str, w: &str) -> bool {
        let Some(&v_ix) = self.node_index.get(v) else {
            return false;
        };
        let Some(&w_ix) = self.node_index.get(w) else {
            return false;
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_ix)
            .iter()
            .any(|&e| self.edges[e].w_ix == w_ix)
            || cache
                .in_edges(v_ix)
                .iter()
                .any(|&e| self.edges[e].v_ix == w_ix)
    }

    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_ix)
            .iter()
            .map(|&edge_ix| &self.edges[edge_ix].key)
            .filter(|k| w.is_none_or(|w| k.w == w))
            .cloned()
            .collect()
    }
}
