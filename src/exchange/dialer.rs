//! Exchange Dialer
//!
//! Opens one outbound connection per peer and streams that peer's bucket to it.
//!
//! ## Stream layout
//! Each connection carries the bucket's records as data frames, in bucket order, followed
//! by exactly one sentinel frame. The write half is then shut down so the peer sees a
//! clean end-of-stream right after the sentinel.

use super::error::ExchangeError;
use crate::partition::partitioner::PartitionMap;
use crate::record::protocol::{SENTINEL_FRAME, encode_data};
use crate::record::types::Record;
use crate::topology::config::Topology;
use crate::topology::types::NodeId;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

const INITIAL_DIAL_DELAY: Duration = Duration::from_millis(50);
const MAX_DIAL_DELAY: Duration = Duration::from_secs(1);
const MAX_DIAL_ATTEMPTS: usize = 600;

/// Reconnect policy used while a peer is not yet listening.
///
/// Delays double from `initial_delay` up to `max_delay`, with up to 50ms of jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: usize,
}

impl Default for DialPolicy {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_DIAL_DELAY,
            max_delay: MAX_DIAL_DELAY,
            max_attempts: MAX_DIAL_ATTEMPTS,
        }
    }
}

/// A spawned sender: resolves to the number of data frames delivered to `peer`.
pub struct PeerSend {
    pub peer: NodeId,
    pub handle: JoinHandle<Result<usize, ExchangeError>>,
}

pub struct ExchangeDialer {
    this: NodeId,
    topology: Arc<Topology>,
    policy: DialPolicy,
}

impl ExchangeDialer {
    pub fn new(this: NodeId, topology: Arc<Topology>, policy: DialPolicy) -> Self {
        Self {
            this,
            topology,
            policy,
        }
    }

    /// Spawns one sender per peer and returns immediately. Each sender takes its
    /// bucket out of `map`, so buckets are never shared between tasks.
    pub fn spawn_all(&self, map: &mut PartitionMap) -> Vec<PeerSend> {
        let mut sends = Vec::new();

        for peer in self.topology.peers(self.this) {
            let records = map.take(peer.id);
            let addr = peer.addr();
            let peer_id = peer.id;
            let policy = self.policy;

            tracing::debug!("Spawning sender for {} at {} ({} records)", peer_id, addr, records.len());

            let handle = tokio::spawn(async move {
                let stream = connect_with_retry(peer_id, &addr, policy).await?;
                if let Err(e) = stream.set_nodelay(true) {
                    tracing::debug!("Could not set TCP_NODELAY towards {}: {}", peer_id, e);
                }

                let mut writer = BufWriter::new(stream);
                let sent = send_bucket(&mut writer, peer_id, &records).await?;

                tracing::info!("Sent {} record(s) and sentinel to {}", sent, peer_id);
                Ok::<usize, ExchangeError>(sent)
            });

            sends.push(PeerSend {
                peer: peer_id,
                handle,
            });
        }

        sends
    }
}

/// Connects to `addr`, retrying with capped exponential backoff.
pub async fn connect_with_retry(
    peer: NodeId,
    addr: &str,
    policy: DialPolicy,
) -> Result<TcpStream, ExchangeError> {
    let attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                tracing::debug!("Connected to {} at {} (attempt {})", peer, addr, attempt);
                return Ok(stream);
            }
            Err(e) if attempt >= attempts => {
                return Err(ExchangeError::Connect {
                    peer,
                    addr: addr.to_string(),
                    attempts,
                    source: e,
                });
            }
            Err(e) => {
                tracing::trace!("Dial {} at {} failed: {}", peer, addr, e);
                if attempt % 20 == 0 {
                    tracing::warn!("Still waiting for {} at {} ({} attempts)", peer, addr, attempt);
                }

                let jitter = Duration::from_millis(rand::random::<u64>() % 50);
                tokio::time::sleep(delay + jitter).await;
                delay = (delay * 2).min(policy.max_delay);
            }
        }
    }
}

/// Writes `records` as data frames followed by the sentinel, then shuts the writer down.
pub async fn send_bucket<W>(
    writer: &mut W,
    peer: NodeId,
    records: &[Record],
) -> Result<usize, ExchangeError>
where
    W: AsyncWrite + Unpin,
{
    let write_err = |source: std::io::Error| ExchangeError::Write { peer, source };

    for record in records {
        writer.write_all(&encode_data(record)).await.map_err(write_err)?;
    }
    writer.write_all(&SENTINEL_FRAME).await.map_err(write_err)?;
    writer.flush().await.map_err(write_err)?;
    writer.shutdown().await.map_err(write_err)?;

    Ok(records.len())
}

/// Waits for every sender, failing on the first error.
pub async fn wait_all(sends: Vec<PeerSend>) -> Result<usize, ExchangeError> {
    let mut total = 0;
    for send in sends {
        total += send
            .handle
            .await
            .map_err(|source| ExchangeError::Join {
                peer: send.peer,
                source,
            })??;
    }
    Ok(total)
}
