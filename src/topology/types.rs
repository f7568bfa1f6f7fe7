use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a node in the sort cluster. Ids are dense: `0..cluster_size`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A single entry of the topology file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    #[serde(rename = "serverId")]
    pub id: NodeId,
    pub host: String,
    #[serde(deserialize_with = "port_string")]
    pub port: String,
}

impl Node {
    /// `host:port`, in the form accepted by `TcpListener::bind` and `TcpStream::connect`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// On-disk layout of the topology file.
///
/// ```yaml
/// servers:
///   - serverId: 0
///     host: "127.0.0.1"
///     port: "8080"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyFile {
    pub servers: Vec<Node>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("topology lists no servers")]
    Empty,

    #[error("cluster size {0} is not a power of two in [1, 256]")]
    InvalidSize(usize),

    #[error("server id {0} listed more than once")]
    DuplicateId(NodeId),

    #[error("server id {id} out of range for a cluster of {size} nodes")]
    IdOutOfRange { id: NodeId, size: usize },

    #[error("server {id} has an empty host or port")]
    MissingAddress { id: NodeId },

    #[error("{0} is not part of the topology")]
    UnknownNode(NodeId),
}

/// Accepts both `port: "8080"` and `port: 8080`.
fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u16),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    })
}
