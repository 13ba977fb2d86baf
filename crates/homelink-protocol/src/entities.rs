//! Entity-code tables.

use std::collections::HashMap;

/// The actuator and sensor entity tables used for translation.
///
/// Outbound commands address actuators by name; inbound telemetry carries
/// sensor codes. The two tables are disjoint by design and are supplied as
/// configuration rather than hardcoded, so a deployment can extend its
/// entity set without a code change.
#[derive(Debug, Clone)]
pub struct EntityTable {
    actuators: HashMap<String, u8>,
    sensors: HashMap<u8, String>,
}

impl EntityTable {
    /// Build a table from configured maps.
    pub fn new(actuators: HashMap<String, u8>, sensors: HashMap<u8, String>) -> Self {
        EntityTable { actuators, sensors }
    }

    /// Look up the wire digit for an actuator name.
    pub fn actuator_code(&self, name: &str) -> Option<u8> {
        self.actuators.get(name).copied()
    }

    /// Look up the name for a sensor wire digit.
    pub fn sensor_name(&self, code: u8) -> Option<&str> {
        self.sensors.get(&code).map(String::as_str)
    }

    /// Number of known actuator entities.
    pub fn actuator_count(&self) -> usize {
        self.actuators.len()
    }

    /// Number of known sensor entities.
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}

impl Default for EntityTable {
    /// The version-1 tables.
    fn default() -> Self {
        EntityTable::new(
            HashMap::from([("light".to_string(), 1), ("motor".to_string(), 2)]),
            HashMap::from([
                (1, "temperature".to_string()),
                (2, "moisture".to_string()),
                (3, "water_tank".to_string()),
            ]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_disjoint_roles() {
        let table = EntityTable::default();
        assert_eq!(table.actuator_code("light"), Some(1));
        assert_eq!(table.actuator_code("motor"), Some(2));
        assert_eq!(table.actuator_code("water_tank"), None);
        assert_eq!(table.sensor_name(3), Some("water_tank"));
        assert_eq!(table.sensor_name(9), None);
    }
}
