use super::types::{Node, NodeId, TopologyError, TopologyFile};

use anyhow::{Context, Result};
use std::path::Path;

/// Largest supported cluster: node ids are carved out of a single key byte.
pub const MAX_NODES: usize = 256;

/// The validated, read-only cluster layout shared by every component of a node.
///
/// Nodes are stored ordered by id, and ids are guaranteed to be exactly `0..len()`,
/// so the position of a node in `nodes` is its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    pub fn new(mut nodes: Vec<Node>) -> Result<Self, TopologyError> {
        let size = nodes.len();
        if size == 0 {
            return Err(TopologyError::Empty);
        }
        if !size.is_power_of_two() || size > MAX_NODES {
            return Err(TopologyError::InvalidSize(size));
        }

        let mut seen = vec![false; size];
        for node in &nodes {
            let idx = node.id.0 as usize;
            if idx >= size {
                return Err(TopologyError::IdOutOfRange { id: node.id, size });
            }
            if seen[idx] {
                return Err(TopologyError::DuplicateId(node.id));
            }
            seen[idx] = true;

            if node.host.trim().is_empty() || node.port.trim().is_empty() {
                return Err(TopologyError::MissingAddress { id: node.id });
            }
        }

        nodes.sort_by_key(|node| node.id);
        Ok(Self { nodes })
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: TopologyFile = serde_yaml::from_str(text).context("malformed topology file")?;
        Ok(Self::new(file.servers)?)
    }

    /// Reads and validates the topology file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;

        let topology = Self::from_yaml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        tracing::info!(
            "Loaded topology with {} node(s) from {}",
            topology.len(),
            path.display()
        );
        Ok(topology)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Like [`Topology::get`], but an unknown id is an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, TopologyError> {
        self.get(id).ok_or(TopologyError::UnknownNode(id))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every node except `this`, in id order.
    pub fn peers(&self, this: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.id != this)
    }
}
