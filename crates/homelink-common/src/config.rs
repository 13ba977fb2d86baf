//! Gateway configuration.
//!
//! One immutable [`GatewayConfig`] is deserialized from a JSON file at
//! startup and passed by reference or clone into each component. Nothing in
//! the pipeline reads process environment variables, which keeps the codecs
//! and the pipeline independently testable.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not a valid configuration document.
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Cloud (pub/sub broker) channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudConfig {
    /// Source identifier commands must carry to be accepted, and the
    /// identifier stamped on outbound telemetry.
    pub source_id: String,
    /// Broker host.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Broker credentials.
    pub username: String,
    /// Broker credentials.
    pub password: String,
    /// Keep-alive interval for the broker session, in seconds.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Topic the gateway publishes telemetry to.
    pub transmission_topic: String,
    /// Topic the gateway receives commands on.
    pub reception_topic: String,
    /// 32-byte payload cipher key, hex-encoded.
    pub secret_key: String,
}

/// Serial-wireless (sensor link) channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareConfig {
    /// Device address (host:port for the bench bridge, device id in
    /// deployment).
    pub device_address: String,
    /// Exact frame width expected from the device; frames of any other
    /// length are dropped.
    #[serde(default = "default_frame_len")]
    pub frame_len: usize,
    /// Idle delay between frame reads, in milliseconds.
    #[serde(default = "default_read_idle_ms")]
    pub read_idle_ms: u64,
    /// Origin label recorded in the archive for this link.
    #[serde(default = "default_hardware_origin")]
    pub origin_label: String,
}

/// 433MHz radio configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RfConfig {
    /// GPIO pin driving the transmitter.
    pub tx_pin: u8,
    /// GPIO pin sampling the receiver.
    pub rx_pin: u8,
    /// How many times each frame is repeated on air.
    #[serde(default = "default_tx_repeat")]
    pub tx_repeat: u8,
    /// Protocol table entry used for transmission.
    #[serde(default = "default_tx_protocol")]
    pub tx_protocol: u8,
    /// Receive tolerance window, as a percentage of the inferred pulse
    /// unit.
    #[serde(default = "default_rx_tolerance")]
    pub rx_tolerance_pct: u32,
}

/// Versioned entity-code tables.
///
/// The outbound (actuator) and inbound (sensor) tables are disjoint by
/// design: commands address actuators, telemetry comes from sensors.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    /// Table version, bumped whenever a mapping changes.
    #[serde(default = "default_entity_version")]
    pub version: u32,
    /// Actuator name → wire digit, used when translating cloud commands.
    #[serde(default = "default_actuators")]
    pub actuators: HashMap<String, u8>,
    /// Sensor wire digit → name, used when translating hardware telemetry.
    #[serde(default = "default_sensors")]
    pub sensors: HashMap<u8, String>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            version: default_entity_version(),
            actuators: default_actuators(),
            sensors: default_sensors(),
        }
    }
}

/// Archive storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Directory the per-source signal files live in.
    pub dir: String,
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Capacity of each bounded hand-off queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Poll timeout used by the archive writer when alternating between its
    /// two input queues, in milliseconds.
    #[serde(default = "default_archive_poll_ms")]
    pub archive_poll_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            queue_capacity: default_queue_capacity(),
            archive_poll_ms: default_archive_poll_ms(),
        }
    }
}

/// The complete gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Cloud channel settings.
    pub cloud: CloudConfig,
    /// Serial-wireless channel settings.
    pub hardware: HardwareConfig,
    /// 433MHz radio settings.
    pub rf: RfConfig,
    /// Entity-code tables.
    #[serde(default)]
    pub entities: EntityConfig,
    /// Archive storage settings.
    pub archive: ArchiveConfig,
    /// Pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl GatewayConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn default_keepalive_secs() -> u64 {
    60
}

fn default_frame_len() -> usize {
    9
}

fn default_read_idle_ms() -> u64 {
    50
}

fn default_hardware_origin() -> String {
    "serial-wireless".to_string()
}

fn default_tx_repeat() -> u8 {
    3
}

fn default_tx_protocol() -> u8 {
    1
}

fn default_rx_tolerance() -> u32 {
    80
}

fn default_entity_version() -> u32 {
    1
}

fn default_actuators() -> HashMap<String, u8> {
    HashMap::from([("light".to_string(), 1), ("motor".to_string(), 2)])
}

fn default_sensors() -> HashMap<u8, String> {
    HashMap::from([
        (1, "temperature".to_string()),
        (2, "moisture".to_string()),
        (3, "water_tank".to_string()),
    ])
}

fn default_queue_capacity() -> usize {
    64
}

fn default_archive_poll_ms() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cloud": {
            "source_id": "src",
            "host": "192.168.2.130",
            "port": 1883,
            "username": "tech",
            "password": "secret",
            "transmission_topic": "gateway/tx",
            "reception_topic": "gateway/rx",
            "secret_key": "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
        },
        "hardware": {
            "device_address": "127.0.0.1:7001"
        },
        "rf": {
            "tx_pin": 17,
            "rx_pin": 27
        },
        "archive": {
            "dir": "/var/lib/homelink"
        }
    }"#;

    #[test]
    fn test_parse_minimal_config() {
        let config: GatewayConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.cloud.source_id, "src");
        assert_eq!(config.cloud.keepalive_secs, 60);
        assert_eq!(config.hardware.frame_len, 9);
        assert_eq!(config.rf.tx_repeat, 3);
        assert_eq!(config.rf.rx_tolerance_pct, 80);
        assert_eq!(config.pipeline.queue_capacity, 64);
    }

    #[test]
    fn test_default_entity_tables() {
        let config: GatewayConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.entities.actuators.get("light"), Some(&1));
        assert_eq!(config.entities.actuators.get("motor"), Some(&2));
        assert_eq!(config.entities.sensors.get(&3).map(String::as_str), Some("water_tank"));
        assert_eq!(config.entities.version, 1);
    }

    #[test]
    fn test_explicit_entity_tables_override_defaults() {
        let mut doc: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        doc["entities"] = serde_json::json!({
            "version": 2,
            "actuators": {"light": 1, "motor": 2, "valve": 3},
            "sensors": {"1": "temperature"}
        });
        let config: GatewayConfig = serde_json::from_value(doc).unwrap();
        assert_eq!(config.entities.version, 2);
        assert_eq!(config.entities.actuators.get("valve"), Some(&3));
        assert_eq!(config.entities.sensors.len(), 1);
    }
}
