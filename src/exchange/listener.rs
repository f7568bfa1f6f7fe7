//! Exchange Listener
//!
//! Accepts one inbound connection per peer and turns each byte stream into frames.
//!
//! ## Responsibilities
//! - **Readiness**: `bind` returns only once the socket is bound, so dialers started
//!   afterwards never race an unbound port on this node.
//! - **Reassembly**: TCP may split or merge frames arbitrarily; reads are buffered until
//!   a full 101-byte frame is available.
//! - **Fan-in**: every reader pushes onto the same channel. Order is kept per connection only.

use super::error::{ExchangeError, PeerConn};
use crate::record::protocol::{FRAME_LEN, Frame};

use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// What a connection reader reports to the assembly loop.
#[derive(Debug)]
pub enum InboundEvent {
    Frame { conn: PeerConn, frame: Frame },
    /// Clean end-of-stream on a frame boundary.
    Closed { conn: PeerConn },
    Failed(ExchangeError),
}

pub struct ExchangeListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl ExchangeListener {
    pub async fn bind(addr: &str) -> Result<Self, ExchangeError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ExchangeError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ExchangeError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        tracing::info!("Exchange listener bound on {}", local_addr);
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawns the accept loop. It accepts exactly `expected` connections, starting one
    /// reader task per connection, then drops the listening socket.
    pub fn spawn(self, expected: usize, events: UnboundedSender<InboundEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.accept_loop(expected, events).await;
        })
    }

    async fn accept_loop(self, expected: usize, events: UnboundedSender<InboundEvent>) {
        for seq in 0..expected {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let conn = PeerConn { seq, addr };
                    tracing::info!("Accepted {} ({}/{})", conn, seq + 1, expected);

                    if let Err(e) = stream.set_nodelay(true) {
                        tracing::debug!("Could not set TCP_NODELAY on {}: {}", conn, e);
                    }

                    let events = events.clone();
                    tokio::spawn(async move {
                        read_connection(BufReader::new(stream), conn, events).await;
                    });
                }
                Err(e) => {
                    tracing::error!("Accept failed on {}: {}", self.local_addr, e);
                    let _ = events.send(InboundEvent::Failed(ExchangeError::Accept(e)));
                    return;
                }
            }
        }

        tracing::debug!("All {} peer connection(s) accepted", expected);
    }
}

/// Decodes frames from one connection until end-of-stream or error.
///
/// Stops early if the assembly loop has already dropped the receiving end.
pub async fn read_connection<R>(mut reader: R, conn: PeerConn, events: UnboundedSender<InboundEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut frames = 0usize;

    loop {
        let event = match read_frame(&mut reader, conn).await {
            Ok(Some(frame)) => {
                frames += 1;
                InboundEvent::Frame { conn, frame }
            }
            Ok(None) => {
                tracing::debug!("{} closed after {} frame(s)", conn, frames);
                let _ = events.send(InboundEvent::Closed { conn });
                return;
            }
            Err(e) => {
                tracing::error!("Dropping {}: {}", conn, e);
                let _ = events.send(InboundEvent::Failed(e));
                return;
            }
        };

        if events.send(event).is_err() {
            tracing::trace!("Assembly finished, stop reading {}", conn);
            return;
        }
    }
}

/// Reads exactly one frame, buffering partial reads.
///
/// Returns `Ok(None)` when the stream ends cleanly before the first byte of a frame.
pub async fn read_frame<R>(reader: &mut R, conn: PeerConn) -> Result<Option<Frame>, ExchangeError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; FRAME_LEN];
    let mut filled = 0;

    while filled < FRAME_LEN {
        let n = reader
            .read(&mut buf[filled..])
            .await
            .map_err(|source| ExchangeError::Read { peer: conn, source })?;

        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(ExchangeError::TruncatedFrame {
                peer: conn,
                received: filled,
            });
        }
        filled += n;
    }

    Frame::decode(&buf)
        .map(Some)
        .map_err(|source| ExchangeError::Malformed { peer: conn, source })
}
