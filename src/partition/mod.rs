//! Partitioning Module
//!
//! Decides which node owns a record. The key space is split into `N` contiguous
//! ranges using the top `log2(N)` bits of the first key byte, so node `i` receives
//! keys that sort entirely before those of node `i + 1`. Concatenating the nodes'
//! sorted outputs in id order yields the globally sorted dataset.

pub mod partitioner;

#[cfg(test)]
mod tests;
