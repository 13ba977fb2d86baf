//! The append-only signal archive capability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SignalSource;

/// Maximum stored length of the `message` field, in bytes.
pub const MESSAGE_FIELD_CAP: usize = 128;
/// Maximum stored length of the `protocol` field, in bytes.
pub const PROTOCOL_FIELD_CAP: usize = 32;
/// Maximum stored length of the `origin` field, in bytes.
pub const ORIGIN_FIELD_CAP: usize = 64;

/// Errors reported by an archive backend.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Underlying file or device I/O failed.
    #[error("archive i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be serialized.
    #[error("archive serialization error: {0}")]
    Serialize(String),
}

/// One persisted copy of an inbound signal.
///
/// Records are append-only: once written they are never mutated or deleted.
/// String fields are truncated to their schema caps at construction so a
/// single oversized payload cannot bloat the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Monotonically assigned serial number.
    pub serial: u64,
    /// Which channel the signal arrived through.
    pub source: SignalSource,
    /// Signal payload (lossy UTF-8, capped at [`MESSAGE_FIELD_CAP`]).
    pub message: String,
    /// Transport protocol name, e.g. `MQTT` (capped at [`PROTOCOL_FIELD_CAP`]).
    pub protocol: String,
    /// Source-specific discriminator, e.g. the broker or device identity
    /// (capped at [`ORIGIN_FIELD_CAP`]).
    pub origin: String,
    /// When the signal was received by the gateway.
    pub incoming_time: DateTime<Utc>,
}

impl ArchiveRecord {
    /// Build a record, applying the per-field caps.
    pub fn new(
        serial: u64,
        source: SignalSource,
        message: &[u8],
        protocol: &str,
        origin: &str,
        incoming_time: DateTime<Utc>,
    ) -> Self {
        ArchiveRecord {
            serial,
            source,
            message: truncate_to(String::from_utf8_lossy(message).into_owned(), MESSAGE_FIELD_CAP),
            protocol: truncate_to(protocol.to_string(), PROTOCOL_FIELD_CAP),
            origin: truncate_to(origin.to_string(), ORIGIN_FIELD_CAP),
            incoming_time,
        }
    }
}

/// Truncate a string to at most `cap` bytes on a char boundary.
fn truncate_to(mut s: String, cap: usize) -> String {
    if s.len() > cap {
        let mut end = cap;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// The on-disk signal archive, consumed as an opaque append capability.
///
/// Implementations must flush every record before returning so that a
/// crash after `append` never loses an acknowledged write.
pub trait SignalArchive: Send {
    /// Persist one record.
    fn append(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError>;
}
