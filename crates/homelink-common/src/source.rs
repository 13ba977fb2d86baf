//! Signal source tags.

use serde::{Deserialize, Serialize};

/// Routing-queue tag for signals that arrived from the cloud channel.
pub const CLOUD_SIGNAL_TAG: &str = "cloud";
/// Routing-queue tag for signals that arrived from the hardware channel.
pub const HARDWARE_SIGNAL_TAG: &str = "hardware";

/// Which physical channel a signal entered the gateway through.
///
/// The tag is assigned once by the receiving channel adapter and never
/// changes while the signal traverses the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    /// The remote pub/sub broker.
    Cloud,
    /// The local serial-wireless sensor link.
    Hardware,
}

impl SignalSource {
    /// The string tag used on the routing queue and in archive files.
    pub fn tag(&self) -> &'static str {
        match self {
            SignalSource::Cloud => CLOUD_SIGNAL_TAG,
            SignalSource::Hardware => HARDWARE_SIGNAL_TAG,
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
