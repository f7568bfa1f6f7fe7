//! Topology Module Tests
//!
//! ## Test Scopes
//! - **Parsing**: the YAML layout of the topology file.
//! - **Validation**: cluster size and id density checks.
//! - **Lookup**: node and peer queries.

#[cfg(test)]
mod tests {
    use crate::topology::config::Topology;
    use crate::topology::types::{Node, NodeId, TopologyError};
    use std::io::Write;

    fn node(id: u32) -> Node {
        Node {
            id: NodeId(id),
            host: "127.0.0.1".to_string(),
            port: format!("{}", 9000 + id),
        }
    }

    // ============================================================
    // PARSING TESTS
    // ============================================================

    #[test]
    fn test_parse_yaml_topology() {
        let yaml = r#"
servers:
  - serverId: 0
    host: "127.0.0.1"
    port: "8080"
  - serverId: 1
    host: "127.0.0.1"
    port: "8081"
"#;
        let topology = Topology::from_yaml(yaml).unwrap();

        assert_eq!(topology.len(), 2);
        assert_eq!(topology.get(NodeId(1)).unwrap().addr(), "127.0.0.1:8081");
    }

    #[test]
    fn test_parse_numeric_port() {
        let yaml = r#"
servers:
  - serverId: 0
    host: localhost
    port: 7000
"#;
        let topology = Topology::from_yaml(yaml).unwrap();

        assert_eq!(topology.get(NodeId(0)).unwrap().port, "7000");
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        assert!(Topology::from_yaml("servers: [").is_err());
        assert!(Topology::from_yaml("nodes: []").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "servers:\n  - serverId: 0\n    host: 10.0.0.1\n    port: \"5000\""
        )
        .unwrap();

        let topology = Topology::load(file.path()).unwrap();
        assert_eq!(topology.len(), 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Topology::load(dir.path().join("missing.yaml")).is_err());
    }

    // ============================================================
    // VALIDATION TESTS
    // ============================================================

    #[test]
    fn test_nodes_sorted_by_id() {
        let topology = Topology::new(vec![node(3), node(1), node(0), node(2)]).unwrap();

        let ids: Vec<u32> = topology.nodes().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rejects_empty_topology() {
        assert_eq!(Topology::new(vec![]).unwrap_err(), TopologyError::Empty);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let err = Topology::new(vec![node(0), node(1), node(2)]).unwrap_err();
        assert_eq!(err, TopologyError::InvalidSize(3));
    }

    #[test]
    fn test_rejects_sparse_ids() {
        let err = Topology::new(vec![node(0), node(5)]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::IdOutOfRange {
                id: NodeId(5),
                size: 2
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Topology::new(vec![node(1), node(1)]).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateId(NodeId(1)));
    }

    #[test]
    fn test_rejects_empty_port() {
        let mut bad = node(0);
        bad.port = String::new();

        assert_eq!(
            Topology::new(vec![bad]).unwrap_err(),
            TopologyError::MissingAddress { id: NodeId(0) }
        );
    }

    // ============================================================
    // LOOKUP TESTS
    // ============================================================

    #[test]
    fn test_peers_excludes_self() {
        let topology = Topology::new((0..4).map(node).collect()).unwrap();

        let peers: Vec<NodeId> = topology.peers(NodeId(2)).map(|n| n.id).collect();
        assert_eq!(peers, vec![NodeId(0), NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_unknown_node_lookup() {
        let topology = Topology::new(vec![node(0), node(1)]).unwrap();

        assert!(topology.get(NodeId(2)).is_none());
        assert_eq!(
            topology.node(NodeId(2)).unwrap_err(),
            TopologyError::UnknownNode(NodeId(2))
        );
    }
}
