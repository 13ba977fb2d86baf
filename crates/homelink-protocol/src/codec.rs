//! The cloud ⇄ hardware format codec.

use crate::command::{CloudCommand, HardwareCommand, SwitchAction};
use crate::entities::EntityTable;
use crate::error::ProtocolError;
use crate::layout::*;
use crate::telemetry::HardwareTelemetry;

/// Stateless translator between the cloud wire grammar and the hardware
/// wire grammar.
///
/// Construction takes the configured source identifier and entity tables;
/// after that every call is pure. Rejections never cross this boundary as
/// anything but a [`ProtocolError`].
#[derive(Debug, Clone)]
pub struct FormatCodec {
    source_id: String,
    entities: EntityTable,
}

impl FormatCodec {
    /// Create a codec for the given source identity and entity tables.
    pub fn new(source_id: impl Into<String>, entities: EntityTable) -> Self {
        FormatCodec {
            source_id: source_id.into(),
            entities,
        }
    }

    /// The configured source identifier.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Translate a decrypted cloud command into an outbound hardware frame.
    ///
    /// Grammar: `<source>/<zone>/<entity>/<target>/<action>` with the
    /// source tag equal to the configured identifier, zone in 1..=99, a
    /// known actuator entity, target in 0..=999 (0 = all), and an
    /// `on`/`off` action.
    pub fn cloud_to_hardware(&self, payload: &[u8]) -> Result<HardwareCommand, ProtocolError> {
        let text = std::str::from_utf8(payload).map_err(|_| ProtocolError::NotText)?;
        Ok(self.parse_cloud_command(text)?.to_hardware())
    }

    /// Parse and validate a decrypted cloud command.
    pub fn parse_cloud_command(&self, text: &str) -> Result<CloudCommand, ProtocolError> {
        let parts: Vec<&str> = text.split(MSG_SEPARATOR).collect();
        if parts.len() != CLOUD_PART_COUNT {
            return Err(ProtocolError::PartCount {
                expected: CLOUD_PART_COUNT,
                actual: parts.len(),
            });
        }
        if parts[0] != self.source_id {
            return Err(ProtocolError::SourceMismatch(parts[0].to_string()));
        }

        let zone: u32 = parts[1]
            .parse()
            .ok()
            .filter(|z| (1..=MAX_ZONE).contains(z))
            .ok_or_else(|| ProtocolError::ZoneOutOfRange(parts[1].to_string()))?;

        let entity_code = self
            .entities
            .actuator_code(parts[2])
            .ok_or_else(|| ProtocolError::UnknownEntity(parts[2].to_string()))?;

        let target: u32 = parts[3]
            .parse()
            .ok()
            .filter(|t| *t <= MAX_ENTITY_ID)
            .ok_or_else(|| ProtocolError::TargetOutOfRange(parts[3].to_string()))?;

        let action = SwitchAction::from_token(parts[4])
            .ok_or_else(|| ProtocolError::UnknownAction(parts[4].to_string()))?;

        Ok(CloudCommand {
            zone: zone as u8,
            entity_code,
            target: target as u16,
            action,
        })
    }

    /// Translate an inbound telemetry frame into a cloud command string.
    ///
    /// Output grammar: `<source>/<zone>/<entity-name>/<id>/<value>`, each
    /// numeric field zero-padded to its canonical width.
    pub fn hardware_to_cloud(&self, frame: &[u8]) -> Result<String, ProtocolError> {
        let text = std::str::from_utf8(frame).map_err(|_| ProtocolError::NonNumeric {
            field: "frame",
            value: String::from_utf8_lossy(frame).into_owned(),
        })?;
        let telemetry = HardwareTelemetry::parse(text)?;

        let entity_name = self
            .entities
            .sensor_name(telemetry.entity_code)
            .ok_or(ProtocolError::UnknownEntityCode(telemetry.entity_code))?;

        Ok(format!(
            "{src}{sep}{zone:0zw$}{sep}{name}{sep}{id:0iw$}{sep}{value:0vw$}",
            src = self.source_id,
            sep = MSG_SEPARATOR,
            zone = telemetry.zone,
            name = entity_name,
            id = telemetry.id,
            value = telemetry.value,
            zw = ZONE_WIDTH,
            iw = ENTITY_ID_WIDTH,
            vw = ANALOG_VALUE_WIDTH,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> FormatCodec {
        FormatCodec::new("src", EntityTable::default())
    }

    // ------------------------------------------------------------------
    // cloud → hardware
    // ------------------------------------------------------------------

    #[test]
    fn test_cloud_to_hardware_all_lights_on() {
        let command = fixture().cloud_to_hardware(b"src/1/light/0/on").unwrap();
        assert_eq!(command.wire(), "01100001");
    }

    #[test]
    fn test_cloud_to_hardware_specific_motor_off() {
        let command = fixture().cloud_to_hardware(b"src/12/motor/34/off").unwrap();
        assert_eq!(command.wire(), "12210340");
        assert_eq!(command.wire().len(), HW_COMMAND_LEN);
    }

    #[test]
    fn test_rejects_wrong_part_count() {
        let err = fixture().cloud_to_hardware(b"src/1/light/on").unwrap_err();
        assert_eq!(err, ProtocolError::PartCount { expected: 5, actual: 4 });

        let err = fixture().cloud_to_hardware(b"src/1/light/0/on/extra").unwrap_err();
        assert_eq!(err, ProtocolError::PartCount { expected: 5, actual: 6 });
    }

    #[test]
    fn test_rejects_source_mismatch() {
        let err = fixture().cloud_to_hardware(b"intruder/1/light/0/on").unwrap_err();
        assert_eq!(err, ProtocolError::SourceMismatch("intruder".to_string()));
    }

    #[test]
    fn test_rejects_zone_out_of_range() {
        for bad in ["0", "100", "-3", "x"] {
            let payload = format!("src/{bad}/light/0/on");
            let err = fixture().cloud_to_hardware(payload.as_bytes()).unwrap_err();
            assert_eq!(err, ProtocolError::ZoneOutOfRange(bad.to_string()), "zone {bad}");
        }
    }

    #[test]
    fn test_rejects_unknown_entity() {
        let err = fixture().cloud_to_hardware(b"src/1/toaster/0/on").unwrap_err();
        assert_eq!(err, ProtocolError::UnknownEntity("toaster".to_string()));
    }

    #[test]
    fn test_rejects_target_out_of_range() {
        for bad in ["1000", "-1", "all"] {
            let payload = format!("src/1/light/{bad}/on");
            let err = fixture().cloud_to_hardware(payload.as_bytes()).unwrap_err();
            assert_eq!(err, ProtocolError::TargetOutOfRange(bad.to_string()), "target {bad}");
        }
    }

    #[test]
    fn test_rejects_unknown_action() {
        let err = fixture().cloud_to_hardware(b"src/1/light/0/toggle").unwrap_err();
        assert_eq!(err, ProtocolError::UnknownAction("toggle".to_string()));
    }

    #[test]
    fn test_rejects_non_text_payload() {
        let err = fixture().cloud_to_hardware(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(err, ProtocolError::NotText);
    }

    #[test]
    fn test_rejects_are_direction_tagged() {
        let cloud_err = fixture().cloud_to_hardware(b"x/1/light/0/on").unwrap_err();
        assert!(cloud_err.is_cloud_reject());

        let hw_err = fixture().hardware_to_cloud(b"xx3004045").unwrap_err();
        assert!(hw_err.is_hardware_reject());
    }

    // ------------------------------------------------------------------
    // hardware → cloud
    // ------------------------------------------------------------------

    #[test]
    fn test_hardware_to_cloud_water_tank() {
        let out = fixture().hardware_to_cloud(b"013004045").unwrap();
        assert_eq!(out, "src/01/water_tank/004/045");
    }

    #[test]
    fn test_hardware_to_cloud_pads_every_field() {
        let out = fixture().hardware_to_cloud(b"991000007").unwrap();
        assert_eq!(out, "src/99/temperature/000/007");
    }

    #[test]
    fn test_rejects_unknown_sensor_code() {
        let err = fixture().hardware_to_cloud(b"019004045").unwrap_err();
        assert_eq!(err, ProtocolError::UnknownEntityCode(9));
    }

    #[test]
    fn test_rejects_short_and_long_frames() {
        assert!(matches!(
            fixture().hardware_to_cloud(b"01300404").unwrap_err(),
            ProtocolError::FrameLength { actual: 8, .. }
        ));
        assert!(matches!(
            fixture().hardware_to_cloud(b"0130040455").unwrap_err(),
            ProtocolError::FrameLength { actual: 10, .. }
        ));
    }

    #[test]
    fn test_rejects_non_numeric_slices() {
        let err = fixture().hardware_to_cloud(b"ab3004045").unwrap_err();
        assert!(matches!(err, ProtocolError::NonNumeric { field: "zone", .. }));
    }

    // ------------------------------------------------------------------
    // format round-trip (per direction, tables are disjoint by design)
    // ------------------------------------------------------------------

    #[test]
    fn test_cloud_fields_survive_to_wire_frame() {
        let codec = fixture();
        for (zone, entity, code, target, action, digit) in [
            (1u8, "light", 1u8, 0u16, "on", '1'),
            (99, "motor", 2, 999, "off", '0'),
            (50, "light", 1, 123, "on", '1'),
        ] {
            let payload = format!("src/{zone}/{entity}/{target}/{action}");
            let command = codec.cloud_to_hardware(payload.as_bytes()).unwrap();
            let wire = command.wire();
            assert_eq!(wire.len(), HW_COMMAND_LEN);
            assert_eq!(wire[..2].parse::<u8>().unwrap(), zone);
            assert_eq!(wire[2..3].parse::<u8>().unwrap(), code);
            assert_eq!(wire[3..4], *if target == 0 { "0" } else { "1" });
            assert_eq!(wire[4..7].parse::<u16>().unwrap(), target);
            assert_eq!(wire.chars().last().unwrap(), digit);
        }
    }

    #[test]
    fn test_telemetry_fields_survive_to_cloud_string() {
        let codec = fixture();
        let out = codec.hardware_to_cloud(b"072123999").unwrap();
        let parts: Vec<&str> = out.split('/').collect();
        assert_eq!(parts, vec!["src", "07", "moisture", "123", "999"]);
    }
}
