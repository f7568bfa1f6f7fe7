//! Distributed Sort Cluster Library
//!
//! This library crate defines the modules that make up one node of a distributed
//! external sort. It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`record`**: The fixed 100-byte record and the 101-byte frame that carries it
//!   between nodes, including the all-ones sentinel frame.
//! - **`topology`**: The static cluster layout loaded from a YAML file and validated
//!   (power-of-two size, dense ids).
//! - **`partition`**: Routes each record to its owning node using the high-order bits
//!   of the first key byte.
//! - **`exchange`**: The peer-to-peer shuffle. A listener fans inbound frames into one
//!   channel, dialers stream each peer's bucket, and the assembly loop stops once every
//!   peer's sentinel has arrived.
//! - **`sorter`**: Orders the assembled records by key and writes them out.
//! - **`node`**: Runs the pipeline above for a single node.

pub mod exchange;
pub mod node;
pub mod partition;
pub mod record;
pub mod sorter;
pub mod topology;
