use crate::constants::EXTENDED_IDS;
use crate::errors::DiscoveryError;
use ::oui::OuiDatabase;
use eui48::MacAddress;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct CompanyEntry {
    company: String,
}

/// Read-only lookup service over the static reference tables.
///
/// All tables are loaded eagerly at construction; a missing or unreadable
/// file is a fatal startup condition rather than a silent empty table.
pub struct VendorDb {
    primary: OuiDatabase,
    secondary: HashMap<String, String>,
    companies: HashMap<u16, String>,
}

impl VendorDb {
    pub fn load(
        primary_path: &Path,
        secondary_path: &Path,
        company_ids_path: &Path,
    ) -> Result<Self, DiscoveryError> {
        let primary = OuiDatabase::new_from_file(&*primary_path.to_string_lossy())
            .map_err(|err| {
                DiscoveryError::ReferenceData(format!(
                    "failed to load {}: {:?}",
                    primary_path.display(),
                    err
                ))
            })?;

        Ok(Self {
            primary,
            secondary: load_secondary(secondary_path)?,
            companies: load_companies(company_ids_path)?,
        })
    }

    /// Resolve a vendor name from the address's OUI prefix, trying the
    /// primary table first and the secondary table only on a miss.
    /// Malformed addresses resolve to `None`.
    pub fn vendor_by_mac(&self, address: &str) -> Option<String> {
        self.lookup_primary(address)
            .or_else(|| self.lookup_secondary(address))
    }

    /// Resolve a 16-bit company identifier to its registered name
    pub fn company(&self, id: u16) -> Option<&str> {
        self.companies.get(&id).map(String::as_str)
    }

    /// Map a known manufacturer-data payload to its device-class note
    pub fn device_class(&self, payload_hex: &str) -> Option<&'static str> {
        EXTENDED_IDS.get(payload_hex).copied()
    }

    fn lookup_primary(&self, address: &str) -> Option<String> {
        let parsed = MacAddress::parse_str(address).ok()?;
        let entry = self.primary.query_by_mac(&parsed).ok().flatten()?;
        entry.name_long.filter(|name| !name.is_empty())
    }

    fn lookup_secondary(&self, address: &str) -> Option<String> {
        self.secondary.get(&oui_prefix(address)?).cloned()
    }
}

/// First three octets of an address as six uppercase hex digits
fn oui_prefix(address: &str) -> Option<String> {
    let digits: String = address
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if digits.len() < 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits[..6].to_uppercase())
}

/// Parse the tab-separated `PREFIX\tVendor` fallback table
fn load_secondary(path: &Path) -> Result<HashMap<String, String>, DiscoveryError> {
    let text = fs::read_to_string(path).map_err(|err| {
        DiscoveryError::ReferenceData(format!("failed to load {}: {}", path.display(), err))
    })?;

    let mut table = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((prefix, vendor)) = line.split_once('\t') {
            table.insert(prefix.trim().to_uppercase(), vendor.trim().to_string());
        }
    }
    Ok(table)
}

fn load_companies(path: &Path) -> Result<HashMap<u16, String>, DiscoveryError> {
    let text = fs::read_to_string(path).map_err(|err| {
        DiscoveryError::ReferenceData(format!("failed to load {}: {}", path.display(), err))
    })?;

    let entries: HashMap<String, CompanyEntry> = serde_json::from_str(&text).map_err(|err| {
        DiscoveryError::ReferenceData(format!("failed to parse {}: {}", path.display(), err))
    })?;

    Ok(entries
        .into_iter()
        .filter_map(|(id, entry)| Some((id.trim().parse::<u16>().ok()?, entry.company)))
        .collect())
}
