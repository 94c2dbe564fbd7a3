use crate::model::DeviceRecord;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Default)]
struct RegistryState {
    live: HashMap<String, DeviceRecord>,
    history: BTreeMap<u64, DeviceRecord>,
    ordinals: HashMap<String, u64>,
    next_index: u64,
}

/// Concurrency-safe store of observed devices.
///
/// The live map always holds the most recent observation per address; the
/// history map holds the first observation, keyed by a monotonically
/// increasing first-seen index. One lock covers both the check-and-insert
/// sequence and snapshot reads, so a snapshot never observes a
/// half-applied insert.
#[derive(Default)]
pub struct DeviceRegistry {
    state: Mutex<RegistryState>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation. Returns `true` when the address was seen for
    /// the first time; re-observations only refresh the live view.
    pub async fn observe(&self, mut record: DeviceRecord) -> bool {
        let key = record.address.to_uppercase();
        record.address = key.clone();

        let mut state = self.state.lock().await;
        if state.ordinals.contains_key(&key) {
            state.live.insert(key, record);
            return false;
        }

        state.next_index += 1;
        let index = state.next_index;
        state.ordinals.insert(key.clone(), index);
        state.history.insert(index, record.clone());
        state.live.insert(key, record);
        true
    }

    /// Most-recent-per-address view
    pub async fn live_snapshot(&self) -> HashMap<String, DeviceRecord> {
        self.state.lock().await.live.clone()
    }

    /// First-seen-per-address view, ordered by first-seen index
    pub async fn history_snapshot(&self) -> BTreeMap<u64, DeviceRecord> {
        self.state.lock().await.history.clone()
    }

    /// Number of distinct addresses observed so far
    pub async fn count(&self) -> usize {
        self.state.lock().await.ordinals.len()
    }
}
