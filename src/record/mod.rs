//! Record Codec Module
//!
//! Defines the fixed-length record that flows through the sort and the frame format
//! used to carry records between nodes.
//!
//! ## Layout
//! - **Record**: 100 bytes, a 10-byte key followed by a 90-byte payload. Records order by key bytes.
//! - **Frame**: 101 bytes on the wire, a control byte followed by the record body.
//!   Control byte `0` marks a data frame. The sentinel frame is 101 bytes of `1`.

pub mod protocol;
pub mod types;
