use crate::db::VendorDb;
use crate::model::{unix_now, DeviceRecord, RawAdvertisement, Resolution};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Turns one raw advertisement into a classified device record, with the
/// manufacturer and vendor fields resolved through the reference tables.
pub struct Classifier {
    db: Arc<VendorDb>,
}

impl Classifier {
    pub fn new(db: Arc<VendorDb>) -> Self {
        Self { db }
    }

    pub fn classify(&self, adv: &RawAdvertisement) -> DeviceRecord {
        let address = adv.address.to_uppercase();
        let vendor = match self.db.vendor_by_mac(&address) {
            Some(name) => Resolution::Resolved(name),
            None => Resolution::Unresolved,
        };

        DeviceRecord {
            rssi: adv.rssi.unwrap_or(0),
            address,
            manufacturer: self.resolve_manufacturer(&adv.manufacturer_data),
            vendor,
            local_name: adv.local_name.clone(),
            service_uuids: adv.service_uuids.iter().map(|u| u.to_string()).collect(),
            observed_at: unix_now(),
        }
    }

    /// Resolve the manufacturer field from raw manufacturer-data entries.
    ///
    /// When a payload carries more than one entry, only the last one (by
    /// company ID) is retained. The payload bytes are checked against the
    /// extended-ID table before the company lookup; a matching device-class
    /// note is appended to the company name.
    fn resolve_manufacturer(&self, data: &BTreeMap<u16, Vec<u8>>) -> Resolution {
        let Some((id, payload)) = data.iter().next_back() else {
            return Resolution::NotApplicable;
        };

        let note = self.db.device_class(&hex::encode(payload));
        match self.db.company(*id) {
            Some(company) => match note {
                Some(note) => Resolution::Resolved(format!("{} | {}", company, note)),
                None => Resolution::Resolved(company.to_string()),
            },
            None => Resolution::Unresolved,
        }
    }
}
