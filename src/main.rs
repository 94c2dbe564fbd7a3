// ==========================================================
//  blescout — passive BLE discovery and wardriving tool
// ==========================================================

use blescout::classify::Classifier;
use blescout::config::ScanConfig;
use blescout::db::VendorDb;
use blescout::engine::ScanSession;
use blescout::errors::DiscoveryError;
use blescout::persist::PersistenceSink;
use blescout::registry::DeviceRegistry;
use blescout::scan::BleSource;
use blescout::{server, table};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Usage: blescout [OPTIONS]");
    println!("Modes:");
    println!("  -w,  --wardrive    scan and persist results silently");
    println!("  -wv, --live        scan, persist, and render a live device table");
    println!("Options:");
    println!("  --minutes <N>      session budget in minutes (default: 30, 0 = unbounded)");
    println!("  --port <N>         HTTP API port (default: 8000)");
    println!("  --data-dir <PATH>  directory for war_drive.json (default: data)");
    println!("  --db-dir <PATH>    directory holding the reference tables (default: database)");
    println!("  -h, --help         show this help message");
}

#[tokio::main]
async fn main() -> Result<(), DiscoveryError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let raw_args: Vec<String> = std::env::args().collect();
    let mut args = raw_args.iter().skip(1);

    let mut config = ScanConfig::default();
    let mut wardrive = false;
    let mut live = false;

    // Parse command line arguments
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-w" | "--wardrive" => wardrive = true,
            "-wv" | "--live" => {
                wardrive = true;
                live = true;
            }
            "--minutes" => {
                config.session_minutes = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| DiscoveryError::Other("--minutes expects a number".to_string()))?;
            }
            "--port" => {
                config.http_port = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| DiscoveryError::Other("--port expects a port number".to_string()))?;
            }
            "--data-dir" => {
                config.data_dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| DiscoveryError::Other("--data-dir expects a path".to_string()))?;
            }
            "--db-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| DiscoveryError::Other("--db-dir expects a path".to_string()))?;
                config.set_db_dir(Path::new(dir));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                print_usage();
                return Err(DiscoveryError::Other(format!("unknown argument: {}", other)));
            }
        }
    }

    if !wardrive {
        print_usage();
        return Err(DiscoveryError::Other("no scan mode selected".to_string()));
    }

    // Reference tables and the Bluetooth adapter are fatal startup
    // requirements; scanning never begins without them.
    let db = match VendorDb::load(
        &config.primary_oui_path,
        &config.secondary_oui_path,
        &config.company_ids_path,
    ) {
        Ok(db) => Arc::new(db),
        Err(err) => {
            eprintln!("[-] {}", err);
            std::process::exit(1);
        }
    };
    let source = match BleSource::new().await {
        Ok(source) => source,
        Err(err) => {
            eprintln!("[-] {}", err);
            std::process::exit(1);
        }
    };

    let registry = Arc::new(DeviceRegistry::new());
    let sink = PersistenceSink::new(&config.data_dir);
    println!("[+] Saving results to {}", sink.path().display());

    let (stop_tx, stop_rx) = watch::channel(false);

    let interrupt_tx = stop_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nStopping....");
            let _ = interrupt_tx.send(true);
        }
    });

    let bind = format!("{}:{}", config.http_addr, config.http_port);
    let http = tokio::spawn(server::serve(registry.clone(), bind, stop_rx.clone()));
    let renderer = live.then(|| {
        tokio::spawn(table::run_renderer(
            registry.clone(),
            Duration::from_millis(config.refresh_interval_ms),
            stop_rx.clone(),
        ))
    });

    let mut session = ScanSession::new(
        registry.clone(),
        Classifier::new(db),
        Box::new(source),
        Some(sink),
        config,
    );
    if let Err(err) = session.run(stop_rx).await {
        error!("scan session ended early: {}", err);
    }

    // The session's terminal state shuts the presentation sinks down
    let _ = stop_tx.send(true);
    if let Ok(Err(err)) = http.await {
        warn!("web server error: {}", err);
    }
    if let Some(handle) = renderer {
        let _ = handle.await;
    }

    println!("[+] Found a total of: {} devices", registry.count().await);
    Ok(())
}
