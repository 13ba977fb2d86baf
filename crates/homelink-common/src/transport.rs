//! Transport capability traits for the two physical channels.
//!
//! Both transports are external collaborators. The gateway consumes them
//! through these narrow seams so that channel adapters can be driven by
//! mocks in tests, and so that a broker library swap never touches the
//! pipeline.

use std::time::Duration;

use thiserror::Error;

/// Errors reported by a transport backend.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connecting to the remote endpoint failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Publishing a message failed.
    #[error("publish failed: {0}")]
    Publish(String),

    /// Subscribing to a topic failed.
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// The underlying link reported an I/O fault.
    #[error("link i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A message delivered by the cloud transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudMessage {
    /// Topic the message arrived on.
    pub topic: String,
    /// Raw (still encrypted) payload bytes.
    pub payload: Vec<u8>,
}

/// The publish/subscribe transport connecting the gateway to the remote
/// broker.
///
/// Session shape mirrors the two adapter roles: a sender connects,
/// publishes one message, and disconnects; a receiver connects, subscribes,
/// and polls until cancelled or a fatal fault ends the session. Faults are
/// not retried here — connection policy belongs to the caller.
pub trait CloudTransport: Send {
    /// Establish the broker session.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Publish one message to `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Subscribe to `topic` for subsequent [`poll`](CloudTransport::poll) calls.
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next inbound message.
    ///
    /// Returns `Ok(None)` on timeout. An `Err` is a fatal session fault:
    /// the caller is expected to disconnect and terminate the session.
    fn poll(&mut self, timeout: Duration) -> Result<Option<CloudMessage>, TransportError>;

    /// Tear the session down. Safe to call on an already-dead session.
    fn disconnect(&mut self);
}

/// The serial-wireless link delivering hardware telemetry frames.
pub trait HardwareLink: Send {
    /// Connect to the fixed device address.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next frame, reading at most `max_len`
    /// bytes.
    ///
    /// Returns `Ok(None)` on timeout. An `Err` is a fatal link fault and
    /// triggers channel teardown.
    fn recv_frame(
        &mut self,
        max_len: usize,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, TransportError>;

    /// Tear the link down. Safe to call on an already-dead link.
    fn disconnect(&mut self);
}
