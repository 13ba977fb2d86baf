//! Common types and traits for the homelink gateway.
//!
//! This crate holds everything shared between the protocol, radio, and
//! gateway crates:
//!
//! - [`GatewayConfig`]: the single immutable configuration structure built
//!   at startup and handed into every component
//! - [`SignalSource`]: the source tag attached to every inbound signal
//! - [`ArchiveRecord`] and the [`SignalArchive`] capability trait
//! - [`PayloadCipher`], [`CloudTransport`], and [`HardwareLink`] capability
//!   traits for the external collaborators (crypto primitive, pub/sub
//!   broker, serial-wireless device)
//!
//! The capability traits are deliberately narrow: the pipeline consumes
//! connect/publish/subscribe/receive/append/encrypt/decrypt and nothing
//! else, so every collaborator can be mocked in tests.

mod archive;
mod cipher;
mod config;
mod source;
mod transport;

pub use archive::*;
pub use cipher::*;
pub use config::*;
pub use source::*;
pub use transport::*;
