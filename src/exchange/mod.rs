//! Peer Exchange Module
//!
//! Moves every record to the node that owns it. Each pair of distinct nodes uses one
//! TCP connection per direction; all inbound connections of a node feed one channel.
//!
//! ## Phases
//! 1. **Listen**: bind this node's address and accept one connection per peer.
//! 2. **Dial**: connect to every peer and stream its bucket, ending with a sentinel frame.
//! 3. **Assemble**: merge the local bucket with received records until every peer's
//!    sentinel has arrived.
//!
//! ## Submodules
//! - **`listener`**: accept loop and frame reassembly.
//! - **`dialer`**: reconnecting senders, one per peer.
//! - **`assembly`**: the single consumer and its per-peer completion tracking.
//! - **`error`**: failure kinds, attributed to the peer connection they came from.

pub mod assembly;
pub mod dialer;
pub mod error;
pub mod listener;
