//! Cluster Topology Module
//!
//! The static list of nodes taking part in a sort run. Every node loads the same
//! topology file once at startup and never changes it afterwards.
//!
//! ## Invariants
//! - The cluster size is a power of two between 1 and 256.
//! - Node ids are dense: exactly `0..size`, each listed once.

pub mod config;
pub mod types;

#[cfg(test)]
mod tests;
