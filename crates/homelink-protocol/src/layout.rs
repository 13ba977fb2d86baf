//! Wire-layout constants.
//!
//! These constants pin down the field widths and numeric ranges of both
//! grammars so nothing else in the codec hardcodes a magic number.

/// Field separator in the cloud grammar.
pub const MSG_SEPARATOR: char = '/';

/// Number of `/`-separated parts in a cloud command.
pub const CLOUD_PART_COUNT: usize = 5;

/// Highest addressable zone.
pub const MAX_ZONE: u32 = 99;
/// Width of the zero-padded zone field.
pub const ZONE_WIDTH: usize = 2;

/// Width of the entity-code field.
pub const ENTITY_CODE_WIDTH: usize = 1;

/// Width of the all/id flag field in an outbound command.
pub const TARGET_FLAG_WIDTH: usize = 1;

/// Highest addressable entity id.
pub const MAX_ENTITY_ID: u32 = 999;
/// Width of the zero-padded entity-id field.
pub const ENTITY_ID_WIDTH: usize = 3;

/// Width of the action field in an outbound command.
pub const ACTION_WIDTH: usize = 1;

/// Highest analog value a sensor can report.
pub const MAX_ANALOG_VALUE: u32 = 999;
/// Width of the zero-padded analog-value field.
pub const ANALOG_VALUE_WIDTH: usize = 3;

/// Total width of an outbound hardware command frame.
pub const HW_COMMAND_LEN: usize =
    ZONE_WIDTH + ENTITY_CODE_WIDTH + TARGET_FLAG_WIDTH + ENTITY_ID_WIDTH + ACTION_WIDTH;

/// Total width of an inbound hardware telemetry frame.
pub const HW_TELEMETRY_LEN: usize =
    ZONE_WIDTH + ENTITY_CODE_WIDTH + ENTITY_ID_WIDTH + ANALOG_VALUE_WIDTH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_widths_match_grammar() {
        assert_eq!(HW_COMMAND_LEN, 8);
        assert_eq!(HW_TELEMETRY_LEN, 9);
    }
}
