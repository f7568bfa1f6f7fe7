//! Assembly Loop
//!
//! The single consumer of the inbound channel. Builds this node's result set from its
//! own bucket plus every data frame received from peers.
//!
//! Completion is tracked per connection rather than by an aggregate count: each peer
//! opens one connection and must send exactly one sentinel on it. A second sentinel,
//! data after the sentinel, or a close before it are reported against that connection.
//! A connection that stays open without ever sending its sentinel blocks forever.

use super::error::{ExchangeError, PeerConn};
use super::listener::InboundEvent;
use crate::record::protocol::Frame;
use crate::record::types::Record;

use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeerStatus {
    Streaming { frames: usize },
    Finished { frames: usize },
}

pub struct Assembly {
    expected_peers: usize,
    finished: usize,
    peers: HashMap<PeerConn, PeerStatus>,
    records: Vec<Record>,
    local: usize,
}

impl Assembly {
    /// Seeds the result set with the locally-owned bucket.
    pub fn new(local: Vec<Record>, expected_peers: usize) -> Self {
        Self {
            expected_peers,
            finished: 0,
            peers: HashMap::new(),
            local: local.len(),
            records: local,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.finished >= self.expected_peers
    }

    pub fn sentinels(&self) -> usize {
        self.finished
    }

    pub fn received(&self) -> usize {
        self.records.len() - self.local
    }

    pub fn apply(&mut self, event: InboundEvent) -> Result<(), ExchangeError> {
        match event {
            InboundEvent::Frame { conn, frame } => self.apply_frame(conn, frame),
            InboundEvent::Closed { conn } => match self.peers.get(&conn) {
                Some(PeerStatus::Finished { .. }) => Ok(()),
                _ => Err(ExchangeError::MissingSentinel { peer: conn }),
            },
            InboundEvent::Failed(e) => Err(e),
        }
    }

    fn apply_frame(&mut self, conn: PeerConn, frame: Frame) -> Result<(), ExchangeError> {
        let status = self
            .peers
            .entry(conn)
            .or_insert(PeerStatus::Streaming { frames: 0 });

        match (*status, frame) {
            (PeerStatus::Streaming { frames }, Frame::Data(record)) => {
                *status = PeerStatus::Streaming { frames: frames + 1 };
                self.records.push(record);
                Ok(())
            }
            (PeerStatus::Streaming { frames }, Frame::Sentinel) => {
                *status = PeerStatus::Finished { frames };
                self.finished += 1;
                tracing::info!(
                    "{} finished with {} record(s) ({}/{} peers done)",
                    conn,
                    frames,
                    self.finished,
                    self.expected_peers
                );
                Ok(())
            }
            (PeerStatus::Finished { .. }, Frame::Data(_)) => {
                Err(ExchangeError::DataAfterSentinel { peer: conn })
            }
            (PeerStatus::Finished { .. }, Frame::Sentinel) => {
                Err(ExchangeError::DuplicateSentinel { peer: conn })
            }
        }
    }

    /// Consumes events until every expected peer has sent its sentinel.
    pub async fn run(
        mut self,
        events: &mut UnboundedReceiver<InboundEvent>,
    ) -> Result<Vec<Record>, ExchangeError> {
        while !self.is_complete() {
            let event = events.recv().await.ok_or(ExchangeError::ChannelClosed {
                missing: self.expected_peers - self.finished,
            })?;
            self.apply(event)?;
        }

        tracing::info!(
            "Assembly complete: {} local + {} received record(s)",
            self.local,
            self.received()
        );
        Ok(self.records)
    }
}
