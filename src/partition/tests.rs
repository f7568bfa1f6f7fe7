//! Partitioner Tests
//!
//! ## Test Scopes
//! - **Validation**: only powers of two in `[1, 256]` are accepted.
//! - **Routing**: owners derived from the high bits of the first key byte.
//! - **PartitionMap**: bucket contents and ordering.

#[cfg(test)]
mod tests {
    use crate::partition::partitioner::{PartitionError, Partitioner};
    use crate::record::types::{RECORD_LEN, Record};
    use crate::topology::types::NodeId;

    fn record(first: u8, tag: u8) -> Record {
        let mut bytes = [0u8; RECORD_LEN];
        bytes[0] = first;
        bytes[RECORD_LEN - 1] = tag;
        Record::new(bytes)
    }

    // ============================================================
    // VALIDATION TESTS
    // ============================================================

    #[test]
    fn test_accepts_powers_of_two() {
        for n in [1usize, 2, 4, 8, 16, 32, 64, 128, 256] {
            assert!(Partitioner::new(n).is_ok(), "{} should be accepted", n);
        }
    }

    #[test]
    fn test_rejects_invalid_node_counts() {
        for n in [0usize, 3, 6, 100, 512] {
            assert_eq!(
                Partitioner::new(n).unwrap_err(),
                PartitionError::InvalidNodeCount(n)
            );
        }
    }

    // ============================================================
    // ROUTING TESTS
    // ============================================================

    #[test]
    fn test_single_node_owns_everything() {
        let partitioner = Partitioner::new(1).unwrap();

        for first in [0x00u8, 0x7f, 0x80, 0xff] {
            assert_eq!(partitioner.owner(&record(first, 0)), NodeId(0));
        }
    }

    #[test]
    fn test_two_nodes_split_on_top_bit() {
        let partitioner = Partitioner::new(2).unwrap();

        assert_eq!(partitioner.owner(&record(0x10, 0)), NodeId(0));
        assert_eq!(partitioner.owner(&record(0x05, 0)), NodeId(0));
        assert_eq!(partitioner.owner(&record(0x7f, 0)), NodeId(0));
        assert_eq!(partitioner.owner(&record(0x80, 0)), NodeId(1));
        assert_eq!(partitioner.owner(&record(0x90, 0)), NodeId(1));
    }

    #[test]
    fn test_256_nodes_use_whole_byte() {
        let partitioner = Partitioner::new(256).unwrap();

        for first in 0..=255u8 {
            assert_eq!(partitioner.owner(&record(first, 0)), NodeId(first as u32));
        }
    }

    #[test]
    fn test_owner_ignores_rest_of_record() {
        let partitioner = Partitioner::new(8).unwrap();
        let a = record(0xa0, 1);
        let mut bytes = [0xffu8; RECORD_LEN];
        bytes[0] = 0xa0;
        let b = Record::new(bytes);

        assert_eq!(partitioner.owner(&a), partitioner.owner(&b));
    }

    #[test]
    fn test_owner_ranges_are_monotonic() {
        let partitioner = Partitioner::new(16).unwrap();

        let mut previous = NodeId(0);
        for first in 0..=255u8 {
            let owner = partitioner.owner(&record(first, 0));
            assert!(owner >= previous, "owners must not decrease with the key");
            assert!((owner.0 as usize) < partitioner.num_nodes());
            previous = owner;
        }
    }

    // ============================================================
    // PARTITION MAP TESTS
    // ============================================================

    #[test]
    fn test_partition_keeps_bucket_order() {
        let partitioner = Partitioner::new(2).unwrap();
        let input = vec![record(0x10, 1), record(0x90, 2), record(0x05, 3), record(0xf0, 4)];

        let map = partitioner.partition(input);

        assert_eq!(map.bucket(NodeId(0)), &[record(0x10, 1), record(0x05, 3)]);
        assert_eq!(map.bucket(NodeId(1)), &[record(0x90, 2), record(0xf0, 4)]);
        assert_eq!(map.total_records(), 4);
    }

    #[test]
    fn test_partition_empty_input() {
        let partitioner = Partitioner::new(4).unwrap();
        let map = partitioner.partition(Vec::new());

        assert_eq!(map.bucket_sizes(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_take_empties_bucket() {
        let partitioner = Partitioner::new(2).unwrap();
        let mut map = partitioner.partition(vec![record(0x90, 1)]);

        assert_eq!(map.take(NodeId(1)).len(), 1);
        assert!(map.bucket(NodeId(1)).is_empty());
        assert!(map.take(NodeId(7)).is_empty());
    }
}
