#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {edge_id}")]
    MissingEndpoint { edge_id: String },

    #[error("graph contains the node id {id} more than once")]
    DuplicateNode { id: String },

    #[error("node {id} has layer index {layer}, beyond the {count} nodes of its level")]
    LayerOutOfRange { id: String, layer: usize, count: usize },

    #[error("node {id} has position index {position}, beyond the {count} nodes of its level")]
    PositionOutOfRange {
        id: String,
        position: usize,
        count: usize,
    },

    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    #[error("no hierarchy level below node {parent}")]
    UnknownLevel { parent: String },

    #[error("cannot {action} a drag while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
