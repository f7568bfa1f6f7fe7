use crate::record::protocol::FRAME_LEN;
use crate::record::types::RecordError;
use crate::topology::types::NodeId;

use std::fmt;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Identity of one inbound peer connection.
///
/// Peers are not named on the wire, so an accepted connection is identified by its
/// accept order and remote address. Each peer opens exactly one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerConn {
    pub seq: usize,
    pub addr: SocketAddr,
}

impl fmt::Display for PeerConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection #{} from {}", self.seq, self.addr)
    }
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept peer connection: {0}")]
    Accept(#[source] io::Error),

    #[error("read from {peer} failed: {source}")]
    Read {
        peer: PeerConn,
        #[source]
        source: io::Error,
    },

    #[error("{peer} closed mid-frame after {received} of {frame_len} bytes", frame_len = FRAME_LEN)]
    TruncatedFrame { peer: PeerConn, received: usize },

    #[error("{peer} sent a malformed frame: {source}")]
    Malformed {
        peer: PeerConn,
        #[source]
        source: RecordError,
    },

    #[error("{peer} closed before sending its sentinel")]
    MissingSentinel { peer: PeerConn },

    #[error("{peer} sent more than one sentinel")]
    DuplicateSentinel { peer: PeerConn },

    #[error("{peer} sent data after its sentinel")]
    DataAfterSentinel { peer: PeerConn },

    #[error("inbound channel closed with {missing} sentinel(s) outstanding")]
    ChannelClosed { missing: usize },

    #[error("could not connect to {peer} at {addr} after {attempts} attempt(s): {source}")]
    Connect {
        peer: NodeId,
        addr: String,
        attempts: usize,
        #[source]
        source: io::Error,
    },

    #[error("write to {peer} failed: {source}")]
    Write {
        peer: NodeId,
        #[source]
        source: io::Error,
    },

    #[error("sender task for {peer} did not complete: {source}")]
    Join {
        peer: NodeId,
        #[source]
        source: tokio::task::JoinError,
    },
}
