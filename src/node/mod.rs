//! Sort Node Module
//!
//! Wires the partitioner, the exchange and the local sorter into a single run of
//! one cluster node. Configuration is an explicit immutable value handed in at
//! construction; nothing is read from process-wide state.

pub mod runner;
