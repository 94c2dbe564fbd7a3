use blescout::db::VendorDb;
use blescout::errors::DiscoveryError;
use tempfile::TempDir;
use test_utils::{create_test_db, write_reference_tables};


#[test]
fn test_primary_table_hit() {
    let (_dir, db) = create_test_db();
    assert_eq!(
        db.vendor_by_mac("00:17:F2:AA:BB:CC").as_deref(),
        Some("Apple, Inc.")
    );
}

#[test]
fn test_primary_wins_over_secondary() {
    let (_dir, db) = create_test_db();
    // the prefix appears in both tables with different names; the first
    // successful source wins
    assert_eq!(
        db.vendor_by_mac("B8:27:EB:00:00:01").as_deref(),
        Some("Raspberry Pi Foundation")
    );
}

#[test]
fn test_secondary_table_fallback() {
    let (_dir, db) = create_test_db();
    assert_eq!(
        db.vendor_by_mac("D0:39:72:AA:BB:CC").as_deref(),
        Some("Tuya Smart Inc.")
    );
}

#[test]
fn test_secondary_lookup_tolerates_dash_separators() {
    let (_dir, db) = create_test_db();
    assert_eq!(
        db.vendor_by_mac("a4-c1-38-aa-bb-cc").as_deref(),
        Some("Telink Semiconductor")
    );
}

#[test]
fn test_unknown_prefix_is_not_found() {
    let (_dir, db) = create_test_db();
    assert_eq!(db.vendor_by_mac("FE:FE:FE:AA:BB:CC"), None);
}

#[test]
fn test_malformed_address_is_not_found() {
    let (_dir, db) = create_test_db();
    assert_eq!(db.vendor_by_mac("hello world"), None);
    assert_eq!(db.vendor_by_mac(""), None);
    assert_eq!(db.vendor_by_mac("AA:BB"), None);
}

#[test]
fn test_company_lookup() {
    let (_dir, db) = create_test_db();
    assert_eq!(db.company(0xfd50), Some("Tuya"));
    assert_eq!(db.company(76), Some("Apple, Inc."));
    assert_eq!(db.company(0x0001), None);
}

#[test]
fn test_device_class_lookup() {
    let (_dir, db) = create_test_db();
    assert_eq!(
        db.device_class("12020003"),
        Some("Apple Audio Accessory (e.g. AirPods)")
    );
    assert_eq!(db.device_class("deadbeef"), None);
}

#[test]
fn test_missing_primary_table_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (primary, secondary, companies) = write_reference_tables(&dir);
    std::fs::remove_file(&primary).unwrap();

    let result = VendorDb::load(&primary, &secondary, &companies);
    assert!(matches!(result, Err(DiscoveryError::ReferenceData(_))));
}

#[test]
fn test_missing_company_table_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (primary, secondary, companies) = write_reference_tables(&dir);
    std::fs::remove_file(&companies).unwrap();

    let result = VendorDb::load(&primary, &secondary, &companies);
    assert!(matches!(result, Err(DiscoveryError::ReferenceData(_))));
}

#[test]
fn test_unparseable_company_table_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (primary, secondary, companies) = write_reference_tables(&dir);
    std::fs::write(&companies, "not json at all").unwrap();

    let result = VendorDb::load(&primary, &secondary, &companies);
    assert!(matches!(result, Err(DiscoveryError::ReferenceData(_))));
}
