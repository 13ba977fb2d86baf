//! Translation error types.

use thiserror::Error;

/// Errors that can occur when translating between the two wire grammars.
///
/// Every variant is a pure rejection: the codec has no side effects and
/// never panics on malformed input. Variants prefixed "invalid cloud
/// signal" reject the cloud→hardware direction, "invalid hardware signal"
/// the hardware→cloud direction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The payload is not UTF-8 text.
    #[error("invalid cloud signal: payload is not text")]
    NotText,

    /// Wrong number of `/`-separated parts.
    #[error("invalid cloud signal: expected {expected} parts, got {actual}")]
    PartCount {
        /// Parts required by the grammar.
        expected: usize,
        /// Parts actually present.
        actual: usize,
    },

    /// The source tag does not match the configured identifier.
    #[error("invalid cloud signal: unrecognized source tag '{0}'")]
    SourceMismatch(String),

    /// The zone field is not an integer in 1..=99.
    #[error("invalid cloud signal: zone '{0}' outside 1..={max}", max = crate::MAX_ZONE)]
    ZoneOutOfRange(String),

    /// The entity name has no code in the actuator table.
    #[error("invalid cloud signal: unknown entity '{0}'")]
    UnknownEntity(String),

    /// The target field is not an integer in 0..=999.
    #[error("invalid cloud signal: target '{0}' outside 0..={max}", max = crate::MAX_ENTITY_ID)]
    TargetOutOfRange(String),

    /// The action token is neither `on` nor `off`.
    #[error("invalid cloud signal: unknown action '{0}'")]
    UnknownAction(String),

    /// A telemetry frame has the wrong total width.
    #[error("invalid hardware signal: expected {expected} characters, got {actual}")]
    FrameLength {
        /// Width required by the grammar.
        expected: usize,
        /// Width actually received.
        actual: usize,
    },

    /// A fixed-width slice failed to parse as a number.
    #[error("invalid hardware signal: non-numeric {field} field '{value}'")]
    NonNumeric {
        /// Which field failed.
        field: &'static str,
        /// The offending slice.
        value: String,
    },

    /// A numeric field fell outside its declared range.
    #[error("invalid hardware signal: {field} {value} outside {min}..={max}")]
    FieldOutOfRange {
        /// Which field failed.
        field: &'static str,
        /// The parsed value.
        value: u32,
        /// Lowest permitted value.
        min: u32,
        /// Highest permitted value.
        max: u32,
    },

    /// The entity code has no name in the sensor table.
    #[error("invalid hardware signal: unknown entity code {0}")]
    UnknownEntityCode(u8),
}

impl ProtocolError {
    /// True if this rejection belongs to the cloud→hardware direction.
    pub fn is_cloud_reject(&self) -> bool {
        !self.is_hardware_reject()
    }

    /// True if this rejection belongs to the hardware→cloud direction.
    pub fn is_hardware_reject(&self) -> bool {
        matches!(
            self,
            ProtocolError::FrameLength { .. }
                | ProtocolError::NonNumeric { .. }
                | ProtocolError::FieldOutOfRange { .. }
                | ProtocolError::UnknownEntityCode(_)
        )
    }
}
