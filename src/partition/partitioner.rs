use crate::record::types::Record;
use crate::topology::types::NodeId;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartitionError {
    #[error("node count {0} is not a power of two in [1, 256]")]
    InvalidNodeCount(usize),
}

/// Routes records to their owning node by the high-order bits of the first key byte.
///
/// With `num_nodes = 2^bits`, the owner is `key[0] >> (8 - bits)`. Every node computes
/// this independently; nothing on the wire checks that peers agree, so the function
/// must stay pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    num_nodes: usize,
    bits: u32,
}

impl Partitioner {
    pub fn new(num_nodes: usize) -> Result<Self, PartitionError> {
        if num_nodes == 0 || !num_nodes.is_power_of_two() || num_nodes > 256 {
            return Err(PartitionError::InvalidNodeCount(num_nodes));
        }

        Ok(Self {
            num_nodes,
            bits: num_nodes.trailing_zeros(),
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn owner(&self, record: &Record) -> NodeId {
        owner_of(record.key()[0], self.bits)
    }

    /// Classifies a whole shard. Buckets keep the input order of their records.
    pub fn partition(&self, records: Vec<Record>) -> PartitionMap {
        let mut buckets = vec![Vec::new(); self.num_nodes];
        for record in records {
            let owner = self.owner(&record);
            buckets[owner.0 as usize].push(record);
        }
        PartitionMap { buckets }
    }
}

fn owner_of(first_key_byte: u8, bits: u32) -> NodeId {
    // A u8 shift by 8 overflows, so the single-node case is handled here.
    if bits == 0 {
        return NodeId(0);
    }
    NodeId(u32::from(first_key_byte >> (8 - bits)))
}

/// Records of the local shard grouped by destination node.
#[derive(Debug, Default)]
pub struct PartitionMap {
    buckets: Vec<Vec<Record>>,
}

impl PartitionMap {
    pub fn bucket(&self, id: NodeId) -> &[Record] {
        self.buckets
            .get(id.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Moves the bucket for `id` out of the map, leaving it empty.
    pub fn take(&mut self, id: NodeId) -> Vec<Record> {
        self.buckets
            .get_mut(id.0 as usize)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn total_records(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_deterministic() {
        let partitioner = Partitioner::new(4).unwrap();
        let record = Record::new([0xc3; 100]);

        let p1 = partitioner.owner(&record);
        let p2 = partitioner.owner(&record);
        assert_eq!(p1, p2);
        assert_eq!(p1, NodeId(3));
    }
}
