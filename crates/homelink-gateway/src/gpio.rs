//! Sysfs GPIO backend for the radio pins.
//!
//! Drives pins through the Linux `/sys/class/gpio` file interface. Value
//! file handles are kept open across writes because the transmit loop
//! toggles the pin at sub-millisecond rates.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use homelink_rf433::RadioGpio;
use tracing::warn;

/// GPIO port backed by `/sys/class/gpio`.
pub struct SysfsGpio {
    root: PathBuf,
    value_files: HashMap<u8, File>,
}

impl SysfsGpio {
    /// Create a port over the standard sysfs mount.
    pub fn new() -> Self {
        Self::with_root("/sys/class/gpio")
    }

    /// Create a port over an alternate sysfs root (tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        SysfsGpio {
            root: root.into(),
            value_files: HashMap::new(),
        }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn export(&self, pin: u8) {
        if self.pin_dir(pin).exists() {
            return;
        }
        if let Err(e) = std::fs::write(self.root.join("export"), pin.to_string()) {
            warn!(pin, error = %e, "gpio export failed");
        }
    }

    fn set_direction(&mut self, pin: u8, direction: &str) {
        self.export(pin);
        if let Err(e) = std::fs::write(self.pin_dir(pin).join("direction"), direction) {
            warn!(pin, direction, error = %e, "gpio direction change failed");
        }
    }

    fn open_value(&mut self, pin: u8) {
        let path = self.pin_dir(pin).join("value");
        match OpenOptions::new().write(true).open(&path) {
            Ok(file) => {
                self.value_files.insert(pin, file);
            }
            Err(e) => warn!(pin, path = %path.display(), error = %e, "gpio value open failed"),
        }
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioGpio for SysfsGpio {
    fn setup_output(&mut self, pin: u8) {
        self.set_direction(pin, "out");
        self.open_value(pin);
    }

    fn setup_input(&mut self, pin: u8) {
        self.value_files.remove(&pin);
        self.set_direction(pin, "in");
    }

    fn write(&mut self, pin: u8, high: bool) {
        if let Some(file) = self.value_files.get_mut(&pin) {
            let _ = file.seek(SeekFrom::Start(0));
            let _ = file.write_all(if high { b"1" } else { b"0" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fake_sysfs(pin: u8) -> PathBuf {
        let root = std::env::temp_dir().join(format!("homelink-gpio-{}-{pin}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join(format!("gpio{pin}"))).unwrap();
        std::fs::write(root.join(format!("gpio{pin}")).join("direction"), "in").unwrap();
        std::fs::write(root.join(format!("gpio{pin}")).join("value"), "0").unwrap();
        root
    }

    fn read(root: &Path, pin: u8, leaf: &str) -> String {
        std::fs::read_to_string(root.join(format!("gpio{pin}")).join(leaf)).unwrap()
    }

    #[test]
    fn test_output_setup_and_writes() {
        let root = fake_sysfs(17);
        let mut gpio = SysfsGpio::with_root(&root);

        gpio.setup_output(17);
        assert_eq!(read(&root, 17, "direction"), "out");

        gpio.write(17, true);
        assert_eq!(read(&root, 17, "value"), "1");
        gpio.write(17, false);
        assert_eq!(read(&root, 17, "value"), "0");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_input_setup_releases_value_handle() {
        let root = fake_sysfs(27);
        let mut gpio = SysfsGpio::with_root(&root);

        gpio.setup_output(27);
        gpio.setup_input(27);
        assert_eq!(read(&root, 27, "direction"), "in");

        // writes after release are ignored
        gpio.write(27, true);
        assert!(read(&root, 27, "value").starts_with('0'));

        let _ = std::fs::remove_dir_all(&root);
    }
}
