use crate::constants::SERVICE_NOTES;
use crate::model::DeviceRecord;
use crate::registry::DeviceRegistry;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Build the device table: one row per distinct address in first-seen
/// order, with the freshest field values from the live view.
pub fn render(
    history: &BTreeMap<u64, DeviceRecord>,
    live: &HashMap<String, DeviceRecord>,
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(vec![
        "#",
        "RSSI",
        "Mac",
        "Manufacturer",
        "Vendor",
        "Local_name",
        "UUID",
    ]);

    for (index, first) in history {
        let record = live.get(&first.address).unwrap_or(first);
        table.add_row(vec![
            Cell::new(index),
            Cell::new(record.rssi),
            Cell::new(&record.address),
            Cell::new(&record.manufacturer),
            Cell::new(&record.vendor),
            Cell::new(record.local_name.as_deref().unwrap_or("—")),
            Cell::new(format_uuids(&record.service_uuids)),
        ]);
    }

    table
}

/// Annotate advertised service UUIDs with their known short-code labels
pub fn format_uuids(uuids: &[String]) -> String {
    if uuids.is_empty() {
        return "—".to_string();
    }
    uuids
        .iter()
        .map(|uuid| match service_note(uuid) {
            Some(note) => format!("{} ({})", uuid, note),
            None => uuid.clone(),
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn service_note(uuid: &str) -> Option<&'static str> {
    let short = uuid.get(4..8)?;
    SERVICE_NOTES.get(short).copied()
}

/// Redraw the table on a fixed cadence until the shutdown signal flips
pub async fn run_renderer(
    registry: Arc<DeviceRegistry>,
    refresh: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(refresh);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let history = registry.history_snapshot().await;
                let live = registry.live_snapshot().await;
                // clear screen, home cursor
                print!("\x1b[2J\x1b[H");
                println!("{}", render(&history, &live));
                println!("Discovered {} devices", history.len());
            }
            _ = shutdown.changed() => return,
        }
    }
}
