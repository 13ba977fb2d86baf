//! Homelink gateway pipeline.
//!
//! The concurrent machinery bridging the cloud pub/sub channel and the
//! local hardware links:
//!
//! ```text
//! broker ──► cloud adapter ──┐                        ┌──► radio (433MHz)
//!                            ├──► archive ──► router ─┤
//! serial ─► hardware adapter ┘    writer              └──► broker
//! ```
//!
//! Every inbound signal is tagged with its source, persisted to the
//! append-only archive, and only then routed: cloud commands are
//! decrypted, validated against the cloud grammar, re-encoded into the
//! fixed-width hardware grammar, and transmitted on the 433MHz radio;
//! hardware telemetry travels the reverse path and is published encrypted.
//!
//! The external collaborators (broker transport, serial link, archive
//! backend, cipher, GPIO) are injected through the `homelink-common`
//! capability traits; this crate ships concrete implementations for each
//! alongside the pipeline itself.

mod archive_writer;
mod cloud;
mod crypto;
mod error;
mod gpio;
mod hardware;
mod jsonl_archive;
#[cfg(feature = "mqtt")]
mod mqtt;
mod pipeline;
mod router;
mod serial;
mod signal;
mod worker;

pub use archive_writer::*;
pub use cloud::*;
pub use crypto::*;
pub use error::*;
pub use gpio::*;
pub use hardware::*;
pub use jsonl_archive::*;
#[cfg(feature = "mqtt")]
pub use mqtt::*;
pub use pipeline::*;
pub use router::*;
pub use serial::*;
pub use signal::{RoutedSignal, TaggedSignal};
pub use worker::*;
