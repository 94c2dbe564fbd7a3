use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Known non-company manufacturer-data payloads. These identify a device
/// class layered under a company ID (e.g. Apple Continuity frames) and are
/// matched against the full payload hex.
pub static EXTENDED_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("12020002", "Apple Watch (device class)"),
        ("12020003", "Apple Audio Accessory (e.g. AirPods)"),
        ("12020000", "Apple Setup Device (generic)"),
        ("10063b1d", "Apple Nearby/Continuity rotating ID"),
    ])
});

/// Frequently observed 16-bit advertised service UUIDs, used to annotate
/// the UUID column of the live table. Not consulted during classification.
pub static SERVICE_NOTES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fd50", "Tuya"),
        ("fd21", "Xiaomi"),
        ("fe95", "Xiaomi MiBeacon"),
        ("fd6f", "Fitbit"),
        ("fe9f", "Tile"),
        ("fd88", "Oura Ring"),
        ("fdcf", "Amazon Echo Buds"),
        ("fd19", "Garmin"),
        ("fdc0", "Apple Find My"),
        ("fee0", "Samsung"),
        ("fd3d", "Nordic Semiconductor"),
        ("fdc1", "Withings"),
        ("fd12", "Anker Soundcore"),
        ("fdaf", "Google Fast Pair"),
    ])
});
