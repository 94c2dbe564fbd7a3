use blescout::model::DeviceRecord;
use blescout::persist::{PersistenceSink, HISTORY_FILE};
use std::collections::BTreeMap;
use tempfile::TempDir;
use test_utils::create_test_record;


fn snapshot(addresses: &[&str]) -> BTreeMap<u64, DeviceRecord> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, addr)| (i as u64 + 1, create_test_record(addr, -40)))
        .collect()
}

fn read_file(sink: &PersistenceSink) -> BTreeMap<u64, DeviceRecord> {
    let text = std::fs::read_to_string(sink.path()).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_flush_creates_file_and_data_dir() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(&dir.path().join("nested"));

    let appended = sink.flush(&snapshot(&["AA:BB:CC:DD:EE:01"])).unwrap();

    assert_eq!(appended, 1);
    assert!(sink.path().ends_with(HISTORY_FILE));
    assert_eq!(read_file(&sink).len(), 1);
}

#[test]
fn test_missing_file_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());

    sink.flush(&snapshot(&["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"]))
        .unwrap();

    let merged = read_file(&sink);
    assert_eq!(merged.keys().copied().collect::<Vec<u64>>(), vec![1, 2]);
}

#[test]
fn test_merge_appends_only_new_addresses() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());

    sink.flush(&snapshot(&["AA:BB:CC:DD:EE:0A", "AA:BB:CC:DD:EE:0B"]))
        .unwrap();
    let appended = sink
        .flush(&snapshot(&["AA:BB:CC:DD:EE:0B", "AA:BB:CC:DD:EE:0C"]))
        .unwrap();

    assert_eq!(appended, 1);
    let merged = read_file(&sink);
    assert_eq!(merged.len(), 3);

    let addresses: Vec<&str> = merged.values().map(|r| r.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec!["AA:BB:CC:DD:EE:0A", "AA:BB:CC:DD:EE:0B", "AA:BB:CC:DD:EE:0C"]
    );
    // the new address continues the ordinal sequence past the prior maximum
    assert_eq!(merged.keys().copied().collect::<Vec<u64>>(), vec![1, 2, 3]);
    assert_eq!(merged.get(&3).unwrap().address, "AA:BB:CC:DD:EE:0C");
}

#[test]
fn test_existing_records_are_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());

    let mut first = snapshot(&["AA:BB:CC:DD:EE:01"]);
    first.get_mut(&1).unwrap().rssi = -40;
    sink.flush(&first).unwrap();

    let mut second = snapshot(&["AA:BB:CC:DD:EE:01"]);
    second.get_mut(&1).unwrap().rssi = -90;
    sink.flush(&second).unwrap();

    assert_eq!(read_file(&sink).get(&1).unwrap().rssi, -40);
}

#[test]
fn test_reflushing_same_snapshot_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());
    let snap = snapshot(&["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"]);

    sink.flush(&snap).unwrap();
    let appended = sink.flush(&snap).unwrap();

    assert_eq!(appended, 0);
    assert_eq!(read_file(&sink).len(), 2);
}

#[test]
fn test_corrupt_file_is_replaced_by_the_new_snapshot() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());
    std::fs::write(sink.path(), "{ not valid json").unwrap();

    sink.flush(&snapshot(&["AA:BB:CC:DD:EE:01"])).unwrap();

    let merged = read_file(&sink);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get(&1).unwrap().address, "AA:BB:CC:DD:EE:01");
}

#[test]
fn test_no_temp_file_left_behind() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());

    sink.flush(&snapshot(&["AA:BB:CC:DD:EE:01"])).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_wire_shape_on_disk() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::new(dir.path());

    let mut record = create_test_record("AA:BB:CC:DD:EE:01", -55);
    record.local_name = Some("LE-Speaker".to_string());
    sink.flush(&BTreeMap::from([(1, record)])).unwrap();

    let text = std::fs::read_to_string(sink.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let entry = &value["1"];
    assert_eq!(entry["addr"], "AA:BB:CC:DD:EE:01");
    assert_eq!(entry["rssi"], -55);
    assert_eq!(entry["manuf"], "N/A");
    assert_eq!(entry["vendor"], false);
    assert_eq!(entry["name"], "LE-Speaker");
    assert_eq!(entry["uuid"], false);
    assert!(entry["up_time"].is_f64());
}
