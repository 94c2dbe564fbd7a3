use crate::errors::DiscoveryError;
use crate::model::DeviceRecord;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const HISTORY_FILE: &str = "war_drive.json";

/// Sole writer of the persisted wardriving file.
///
/// Each flush merges the given history snapshot with whatever the file
/// already holds: addresses already present keep their ordinal and are not
/// overwritten, new addresses are appended continuing the file's ordinal
/// sequence. An unparseable file is treated as empty and replaced on the
/// next flush; availability is preferred over preserving corrupt data.
pub struct PersistenceSink {
    path: PathBuf,
}

impl PersistenceSink {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge the snapshot into the persisted file. Returns the number of
    /// newly appended records.
    pub fn flush(
        &self,
        snapshot: &BTreeMap<u64, DeviceRecord>,
    ) -> Result<usize, DiscoveryError> {
        let mut merged = self.read_existing()?;

        let mut known: HashSet<String> = merged
            .values()
            .map(|record| record.address.to_uppercase())
            .collect();
        let mut next = merged.keys().next_back().copied().unwrap_or(0);

        let mut appended = 0;
        for record in snapshot.values() {
            let address = record.address.to_uppercase();
            if !known.insert(address) {
                continue;
            }
            next += 1;
            merged.insert(next, record.clone());
            appended += 1;
        }

        self.write_atomic(&merged)?;
        Ok(appended)
    }

    fn read_existing(&self) -> Result<BTreeMap<u64, DeviceRecord>, DiscoveryError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&text) {
            Ok(existing) => Ok(existing),
            Err(err) => {
                warn!(
                    "discarding unparseable history file {}: {}",
                    self.path.display(),
                    err
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write via a sibling temp file and rename, so a reader never observes
    /// a half-written file.
    fn write_atomic(&self, merged: &BTreeMap<u64, DeviceRecord>) -> Result<(), DiscoveryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(merged)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
