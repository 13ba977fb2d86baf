//! Gateway error taxonomy.

use thiserror::Error;

/// Top-level failure kinds in the routing pipeline.
///
/// Propagation policy: a failure in a one-shot send worker terminates that
/// worker only; failures inside a long-lived loop are swallowed at
/// iteration granularity, except connection faults, which end the session.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport connect/publish/subscribe failure. Not retried; the
    /// owning session disconnects and terminates.
    #[error("connection fault: {0}")]
    Connection(#[from] homelink_common::TransportError),

    /// The archive collaborator failed to persist a record.
    #[error("archive failure: {0}")]
    Archive(#[from] homelink_common::ArchiveError),

    /// A payload failed grammar or range validation.
    #[error("invalid signal: {0}")]
    InvalidSignal(#[from] homelink_protocol::ProtocolError),

    /// The encrypt/decrypt capability failed.
    #[error("crypto failure: {0}")]
    Crypto(#[from] homelink_common::CryptoError),

    /// The 433MHz radio refused an operation.
    #[error("radio fault: {0}")]
    Radio(#[from] homelink_rf433::RfError),

    /// A pipeline hand-off queue disconnected underneath a worker.
    #[error("pipeline queue disconnected")]
    QueueDisconnected,

    /// A worker thread panicked.
    #[error("worker '{0}' panicked")]
    WorkerPanicked(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] homelink_common::ConfigError),
}
