//! Outbound command types.

use crate::layout::*;

/// The on/off switch action of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    /// Turn the target off.
    Off,
    /// Turn the target on.
    On,
}

impl SwitchAction {
    /// Parse the cloud grammar's action token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "on" => Some(SwitchAction::On),
            "off" => Some(SwitchAction::Off),
            _ => None,
        }
    }

    /// The single wire digit of this action.
    pub fn wire_digit(&self) -> char {
        match self {
            SwitchAction::Off => '0',
            SwitchAction::On => '1',
        }
    }
}

/// A validated cloud command, ready for hardware encoding.
///
/// Transient value object: constructed, validated, and encoded within a
/// single translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudCommand {
    /// Zone in 1..=99.
    pub zone: u8,
    /// Actuator entity wire digit.
    pub entity_code: u8,
    /// Target id in 0..=999; 0 addresses every entity in the zone.
    pub target: u16,
    /// Requested action.
    pub action: SwitchAction,
}

impl CloudCommand {
    /// Encode into the fixed-width outbound frame.
    pub fn to_hardware(&self) -> HardwareCommand {
        HardwareCommand {
            zone: self.zone,
            entity_code: self.entity_code,
            all_targets: self.target == 0,
            target_id: self.target,
            action: self.action,
        }
    }
}

/// A fixed-width outbound hardware command, layout `ZZ E T III A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareCommand {
    /// Zone in 1..=99.
    pub zone: u8,
    /// Actuator entity wire digit.
    pub entity_code: u8,
    /// True when the command addresses every entity in the zone.
    pub all_targets: bool,
    /// Target id (000 when addressing all).
    pub target_id: u16,
    /// Requested action.
    pub action: SwitchAction,
}

impl HardwareCommand {
    /// Render the 8-character wire frame, zero-padded per field.
    pub fn wire(&self) -> String {
        let flag = if self.all_targets { '0' } else { '1' };
        format!(
            "{:0zw$}{}{}{:0iw$}{}",
            self.zone,
            self.entity_code,
            flag,
            self.target_id,
            self.action.wire_digit(),
            zw = ZONE_WIDTH,
            iw = ENTITY_ID_WIDTH,
        )
    }

    /// The numeric radio code for the frame (the digits read as one
    /// decimal integer), used by the 433MHz send path.
    pub fn radio_code(&self) -> u64 {
        // The wire frame is all ASCII digits by construction.
        self.wire().parse().unwrap_or(0)
    }
}

impl std::fmt::Display for HardwareCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_is_fixed_width() {
        let command = HardwareCommand {
            zone: 1,
            entity_code: 1,
            all_targets: true,
            target_id: 0,
            action: SwitchAction::On,
        };
        assert_eq!(command.wire(), "01100001");
        assert_eq!(command.wire().len(), HW_COMMAND_LEN);
    }

    #[test]
    fn test_specific_target_sets_flag_and_id() {
        let command = HardwareCommand {
            zone: 42,
            entity_code: 2,
            all_targets: false,
            target_id: 7,
            action: SwitchAction::Off,
        };
        assert_eq!(command.wire(), "42210070");
    }

    #[test]
    fn test_radio_code_reads_digits() {
        let command = HardwareCommand {
            zone: 1,
            entity_code: 1,
            all_targets: true,
            target_id: 0,
            action: SwitchAction::On,
        };
        assert_eq!(command.radio_code(), 1_100_001);
    }
}
