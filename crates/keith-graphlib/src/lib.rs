#![forbid(unsafe_code)]

//! Arena graph container used by `keith-interactive`.
//!
//! Nodes are owned by the graph and looked up by id. Edges only store the ids of their
//! endpoints, which keeps node/edge back-references out of the ownership graph.

mod graph;

pub use graph::{EdgeKey, Graph, alg};
