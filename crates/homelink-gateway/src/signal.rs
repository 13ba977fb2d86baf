//! Tagged signals flowing through the pipeline.

use chrono::{DateTime, Utc};
use homelink_common::SignalSource;

/// One inbound signal, tagged with its source at reception.
///
/// Constructed only by the channel adapters (the constructor is
/// crate-private, so nothing outside the receive path can mint one) and
/// consumed within a single pipeline traversal. Ownership passes along the
/// pipeline by value; the signal is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSignal {
    source: SignalSource,
    message: Vec<u8>,
    protocol: String,
    origin_label: String,
    received_at: DateTime<Utc>,
}

impl TaggedSignal {
    /// Record a signal at the moment of reception.
    pub(crate) fn received(
        source: SignalSource,
        message: Vec<u8>,
        protocol: &str,
        origin_label: &str,
    ) -> Self {
        TaggedSignal {
            source,
            message,
            protocol: protocol.to_string(),
            origin_label: origin_label.to_string(),
            received_at: Utc::now(),
        }
    }

    /// Which channel the signal arrived through.
    pub fn source(&self) -> SignalSource {
        self.source
    }

    /// Raw payload bytes as received from the transport.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Transport protocol name, e.g. `MQTT`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Source-specific discriminator for the archive.
    pub fn origin_label(&self) -> &str {
        &self.origin_label
    }

    /// Reception timestamp.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// A routing-queue entry: the source tag travels separately from the
/// signal so the router dispatches on the tag alone.
///
/// Only the archive writer produces these (the fields are crate-private),
/// so a routed signal is by construction one that has been persisted.
#[derive(Debug, Clone)]
pub struct RoutedSignal {
    /// Source tag, normally one of the two well-known tag strings.
    pub(crate) tag: String,
    /// The archived signal.
    pub(crate) signal: TaggedSignal,
}
