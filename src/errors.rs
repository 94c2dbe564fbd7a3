use thiserror::Error;

/// Error types for BLE discovery operations
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Reference Data Error: {0}")]
    ReferenceData(String),

    #[error("Bluetooth Adapter Error: {0}")]
    Adapter(String),

    #[error("Scan Error: {0}")]
    Scan(#[from] btleplug::Error),

    #[error("Persistence Error: {0}")]
    Persist(#[from] serde_json::Error),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error: {0}")]
    Other(String),
}
