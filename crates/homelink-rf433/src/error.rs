//! Radio error types.

use thiserror::Error;

/// Errors that can occur when driving the 433MHz radio.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RfError {
    /// Transmission was attempted without an enabled transmit pin.
    #[error("transmission is not enabled")]
    TransmitDisabled,

    /// A protocol id outside the table's 1..=6 range was requested.
    #[error("protocol {0} is outside the protocol table")]
    UnknownProtocol(u8),

    /// The pin is held by the receiver; transmit cannot be enabled.
    #[error("radio pin is held by the receiver")]
    ReceiveActive,

    /// The pin is held by the transmitter; receive cannot be enabled.
    #[error("radio pin is held by the transmitter")]
    TransmitActive,
}
