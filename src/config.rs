use std::path::{Path, PathBuf};

/// Configuration settings for BLE scan sessions
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Duration in seconds the radio stays active per scan cycle
    pub scan_window_secs: u64,

    /// Overall session budget in minutes for wardriving runs (0 = unbounded)
    pub session_minutes: u64,

    /// Redraw cadence in milliseconds for the live table renderer
    pub refresh_interval_ms: u64,

    /// Bind address for the HTTP API sink
    pub http_addr: String,

    /// Bind port for the HTTP API sink
    pub http_port: u16,

    /// Directory holding the persisted wardriving results
    pub data_dir: PathBuf,

    /// Primary OUI-to-vendor table (Wireshark manuf format)
    pub primary_oui_path: PathBuf,

    /// Secondary prefix-to-vendor table (tab-separated fallback)
    pub secondary_oui_path: PathBuf,

    /// Numeric company-ID-to-name table (JSON)
    pub company_ids_path: PathBuf,
}

impl ScanConfig {
    /// Point all three reference tables at a different base directory
    pub fn set_db_dir(&mut self, dir: &Path) {
        self.primary_oui_path = dir.join("manuf.txt");
        self.secondary_oui_path = dir.join("manuf_ext.txt");
        self.company_ids_path = dir.join("company_ids.json");
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_window_secs: 5,
            session_minutes: 30,
            refresh_interval_ms: 1000,
            http_addr: "0.0.0.0".to_string(),
            http_port: 8000,
            data_dir: PathBuf::from("data"),
            primary_oui_path: PathBuf::from("database/manuf.txt"),
            secondary_oui_path: PathBuf::from("database/manuf_ext.txt"),
            company_ids_path: PathBuf::from("database/company_ids.json"),
        }
    }
}
