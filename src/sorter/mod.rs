//! Local Sort Module
//!
//! Orders a node's final record set by key and persists it as a flat file of
//! 100-byte records with no header or delimiters. Input shards use the same layout.

pub mod local;
