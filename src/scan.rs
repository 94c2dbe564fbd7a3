use crate::errors::DiscoveryError;
use crate::model::RawAdvertisement;
use async_trait::async_trait;
use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager};

/// Boundary to the platform scan primitive.
///
/// `discovered` returns every device the primitive has accumulated since
/// `start`, not only ones new since the last call; consumers must tolerate
/// being re-fed known addresses each cycle.
#[async_trait]
pub trait AdvertisementSource: Send {
    /// Open the scan window
    async fn start(&mut self) -> Result<(), DiscoveryError>;

    /// Close the scan window
    async fn stop(&mut self) -> Result<(), DiscoveryError>;

    /// Snapshot of all devices discovered so far
    async fn discovered(&mut self) -> Result<Vec<RawAdvertisement>, DiscoveryError>;
}

/// Production advertisement source backed by the first system Bluetooth
/// adapter
pub struct BleSource {
    adapter: Adapter,
}

impl BleSource {
    pub async fn new() -> Result<Self, DiscoveryError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::Adapter("no Bluetooth adapter found".to_string()))?;
        Ok(Self { adapter })
    }
}

#[async_trait]
impl AdvertisementSource for BleSource {
    async fn start(&mut self) -> Result<(), DiscoveryError> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DiscoveryError> {
        self.adapter.stop_scan().await?;
        Ok(())
    }

    async fn discovered(&mut self) -> Result<Vec<RawAdvertisement>, DiscoveryError> {
        let mut advertisements = Vec::new();
        for peripheral in self.adapter.peripherals().await? {
            let Some(props) = peripheral.properties().await? else {
                continue;
            };
            advertisements.push(RawAdvertisement {
                address: props.address.to_string(),
                rssi: props.rssi,
                local_name: props.local_name,
                manufacturer_data: props.manufacturer_data.into_iter().collect(),
                service_uuids: props.services,
            });
        }
        Ok(advertisements)
    }
}
