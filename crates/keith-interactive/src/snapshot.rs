//! Inbound graph snapshots.
//!
//! The language server pushes the whole diagram after every change. The snapshot is a tree of
//! elements; nodes contain their children, edges may sit anywhere in the tree. Ingestion sorts
//! it once into one [`LevelGraph`] per hierarchy level. Labels and ports are dropped there.

use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cycles::mark_cycle_inducing;
use crate::error::{Error, Result};
use crate::model::{Direction, EdgeLabel, LevelGraph, Node, Point, Size};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(NodeElement),
    Edge(EdgeElement),
    Label(LabelElement),
    Port(PortElement),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    pub id: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, rename = "shadowPosition", skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Point>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, rename = "layerId")]
    pub layer_id: usize,
    #[serde(default, rename = "layerCons", with = "unset_as_minus_one")]
    pub layer_cons: Option<usize>,
    #[serde(default, rename = "posId")]
    pub pos_id: usize,
    #[serde(default, rename = "posCons", with = "unset_as_minus_one")]
    pub pos_cons: Option<usize>,
    #[serde(default, rename = "iLPredOfConstraint")]
    pub il_pred_of: Option<String>,
    #[serde(default, rename = "iLSuccOfConstraint")]
    pub il_succ_of: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub id: String,
    #[serde(rename = "sourceId")]
    pub source: String,
    #[serde(rename = "targetId")]
    pub target: String,
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelElement {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortElement {
    pub id: String,
}

/// Constraint indices use `-1` for "unset" on the wire.
mod unset_as_minus_one {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_u64(*v as u64),
            None => s.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = Option::<i64>::deserialize(d)?;
        Ok(raw.and_then(|v| usize::try_from(v).ok()))
    }
}

impl From<&NodeElement> for Node {
    fn from(e: &NodeElement) -> Self {
        Node {
            id: e.id.clone(),
            position: e.position,
            size: e.size,
            selected: e.selected,
            shadow: e.shadow,
            direction: e.direction,
            layer_id: e.layer_id,
            layer_cons: e.layer_cons,
            pos_id: e.pos_id,
            pos_cons: e.pos_cons,
            il_pred_of: e.il_pred_of.clone(),
            il_succ_of: e.il_succ_of.clone(),
        }
    }
}

/// One hierarchy level: the children of `parent` (`None` for the diagram root).
#[derive(Debug, Clone)]
pub struct Level {
    pub parent: Option<String>,
    pub graph: LevelGraph,
}

/// An ingested snapshot.
#[derive(Debug, Clone)]
pub struct Diagram {
    levels: Vec<Level>,
    level_of_parent: HashMap<Option<String>, usize>,
    level_of_node: HashMap<String, usize>,
}

impl Default for Diagram {
    fn default() -> Self {
        let mut level_of_parent = HashMap::default();
        level_of_parent.insert(None, 0);
        Self {
            levels: vec![Level {
                parent: None,
                graph: LevelGraph::default(),
            }],
            level_of_parent,
            level_of_node: HashMap::default(),
        }
    }
}

impl Diagram {
    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_str(text)?;
        Self::from_snapshot(&snapshot)
    }

    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self> {
        let mut diagram = Diagram::default();
        let mut edges: Vec<&EdgeElement> = Vec::new();
        diagram.collect(&snapshot.children, None, &mut edges)?;
        for level in &diagram.levels {
            check_indices(&level.graph)?;
        }

        for e in edges {
            let source = diagram.level_of_node.get(&e.source).copied();
            let target = diagram.level_of_node.get(&e.target).copied();
            let (Some(source), Some(target)) = (source, target) else {
                return Err(Error::MissingEndpoint {
                    edge_id: e.id.clone(),
                });
            };
            if source != target {
                trace!(edge = %e.id, "skipping edge that crosses hierarchy levels");
                continue;
            }
            diagram.levels[source].graph.set_edge_named(
                e.source.as_str(),
                e.target.as_str(),
                Some(e.id.as_str()),
                Some(EdgeLabel::new(e.id.as_str())),
            );
        }

        for level in &mut diagram.levels {
            warn_on_layer_gaps(level);
            mark_cycle_inducing(&mut level.graph);
        }
        debug!(
            levels = diagram.levels.len(),
            nodes = diagram.level_of_node.len(),
            "ingested graph snapshot"
        );
        Ok(diagram)
    }

    fn collect<'a>(
        &mut self,
        children: &'a [Element],
        parent: Option<&str>,
        edges: &mut Vec<&'a EdgeElement>,
    ) -> Result<()> {
        for child in children {
            match child {
                Element::Node(n) => {
                    if self.level_of_node.contains_key(&n.id) {
                        return Err(Error::DuplicateNode { id: n.id.clone() });
                    }
                    let level = self.level_index(parent);
                    self.levels[level].graph.set_node(n.id.clone(), Node::from(n));
                    self.level_of_node.insert(n.id.clone(), level);
                    self.collect(&n.children, Some(n.id.as_str()), edges)?;
                }
                Element::Edge(e) => {
                    edges.push(e);
                    self.collect(&e.children, parent, edges)?;
                }
                Element::Label(_) | Element::Port(_) => {}
            }
        }
        Ok(())
    }

    fn level_index(&mut self, parent: Option<&str>) -> usize {
        let key = parent.map(str::to_string);
        if let Some(&ix) = self.level_of_parent.get(&key) {
            return ix;
        }
        let ix = self.levels.len();
        self.levels.push(Level {
            parent: key.clone(),
            graph: LevelGraph::default(),
        });
        self.level_of_parent.insert(key, ix);
        ix
    }

    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// The level holding the children of `parent` (`None` for the root).
    pub fn level(&self, parent: Option<&str>) -> Option<&Level> {
        let ix = self.level_of_parent.get(&parent.map(str::to_string))?;
        self.levels.get(*ix)
    }

    /// The level `node_id` belongs to.
    pub fn level_of(&self, node_id: &str) -> Option<&Level> {
        let ix = self.level_of_node.get(node_id)?;
        self.levels.get(*ix)
    }

    pub fn level_of_mut(&mut self, node_id: &str) -> Option<&mut Level> {
        let ix = *self.level_of_node.get(node_id)?;
        self.levels.get_mut(ix)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.level_of(id)?.graph.node(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.level_of_mut(id)?.graph.node_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.level_of_node.len()
    }
}

/// Layer and position indices of a level never exceed its node count.
fn check_indices(graph: &LevelGraph) -> Result<()> {
    let count = graph.node_count();
    for n in graph.node_labels() {
        if n.layer_id >= count {
            return Err(Error::LayerOutOfRange {
                id: n.id.clone(),
                layer: n.layer_id,
                count,
            });
        }
        if n.pos_id >= count {
            return Err(Error::PositionOutOfRange {
                id: n.id.clone(),
                position: n.pos_id,
                count,
            });
        }
    }
    Ok(())
}

fn warn_on_layer_gaps(level: &Level) {
    let Some(last) = level.graph.node_labels().map(|n| n.layer_id).max() else {
        return;
    };
    let mut seen = vec![false; last + 1];
    for n in level.graph.node_labels() {
        seen[n.layer_id] = true;
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        warn!(
            parent = level.parent.as_deref().unwrap_or("<root>"),
            missing, "layer indices are not contiguous"
        );
    }
}
