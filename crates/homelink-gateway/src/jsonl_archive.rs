//! JSON-lines signal archive.
//!
//! One append-only file per source kind, flushed on every write. Records
//! are never mutated or deleted after append; recovery from a corrupted
//! file handle is out of scope (the writer crashes and the process
//! restarts).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use homelink_common::{ArchiveError, ArchiveRecord, SignalArchive, SignalSource};
use tracing::info;

/// File name for cloud-originated signals.
pub const CLOUD_SIGNAL_FILE: &str = "cloud_signals.jsonl";
/// File name for hardware-originated signals.
pub const HARDWARE_SIGNAL_FILE: &str = "hw_signals.jsonl";

/// Append-only JSON-lines archive with one file per source kind.
pub struct JsonlArchive {
    cloud_file: File,
    hardware_file: File,
}

impl JsonlArchive {
    /// Open (creating if necessary) the archive files under `dir`.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let archive = JsonlArchive {
            cloud_file: open_append(&dir.join(CLOUD_SIGNAL_FILE))?,
            hardware_file: open_append(&dir.join(HARDWARE_SIGNAL_FILE))?,
        };
        info!(dir = %dir.display(), "signal archive opened");
        Ok(archive)
    }
}

fn open_append(path: &PathBuf) -> Result<File, ArchiveError> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

impl SignalArchive for JsonlArchive {
    fn append(&mut self, record: &ArchiveRecord) -> Result<(), ArchiveError> {
        let line = serde_json::to_string(record)
            .map_err(|e| ArchiveError::Serialize(e.to_string()))?;
        let file = match record.source {
            SignalSource::Cloud => &mut self.cloud_file,
            SignalSource::Hardware => &mut self.hardware_file,
        };
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}
