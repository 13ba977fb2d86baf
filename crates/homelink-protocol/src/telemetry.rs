//! Inbound telemetry types.

use crate::error::ProtocolError;
use crate::layout::*;

/// A validated inbound telemetry frame, layout `ZZ E III VVV`.
///
/// Transient value object: parsed, validated, and re-encoded for the cloud
/// within a single translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareTelemetry {
    /// Zone in 1..=99.
    pub zone: u8,
    /// Sensor entity wire digit.
    pub entity_code: u8,
    /// Reporting sensor id in 0..=999.
    pub id: u16,
    /// Analog reading in 0..=999.
    pub value: u16,
}

impl HardwareTelemetry {
    /// Parse and range-check a fixed-width telemetry frame.
    ///
    /// Slicing is positional: any non-numeric slice or out-of-range field
    /// rejects the whole frame.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        if frame.len() != HW_TELEMETRY_LEN {
            return Err(ProtocolError::FrameLength {
                expected: HW_TELEMETRY_LEN,
                actual: frame.len(),
            });
        }
        if !frame.is_ascii() {
            return Err(ProtocolError::NonNumeric {
                field: "frame",
                value: frame.to_string(),
            });
        }

        let zone = parse_field(&frame[..ZONE_WIDTH], "zone")?;
        let entity_start = ZONE_WIDTH;
        let id_start = entity_start + ENTITY_CODE_WIDTH;
        let value_start = id_start + ENTITY_ID_WIDTH;

        let entity_code = parse_field(&frame[entity_start..id_start], "entity")?;
        let id = parse_field(&frame[id_start..value_start], "id")?;
        let value = parse_field(&frame[value_start..], "value")?;

        check_range("zone", zone, 1, MAX_ZONE)?;
        check_range("id", id, 0, MAX_ENTITY_ID)?;
        check_range("value", value, 0, MAX_ANALOG_VALUE)?;

        Ok(HardwareTelemetry {
            zone: zone as u8,
            entity_code: entity_code as u8,
            id: id as u16,
            value: value as u16,
        })
    }
}

fn parse_field(slice: &str, field: &'static str) -> Result<u32, ProtocolError> {
    if slice.chars().all(|c| c.is_ascii_digit()) {
        slice.parse().map_err(|_| ProtocolError::NonNumeric {
            field,
            value: slice.to_string(),
        })
    } else {
        Err(ProtocolError::NonNumeric {
            field,
            value: slice.to_string(),
        })
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ProtocolError> {
    if value < min || value > max {
        return Err(ProtocolError::FieldOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
