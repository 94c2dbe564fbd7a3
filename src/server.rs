use crate::registry::DeviceRegistry;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Read-only HTTP view over the registry, meant to be polled by a
/// decoupled front-end; every response allows any origin.
pub fn router(registry: Arc<DeviceRegistry>) -> Router {
    Router::new()
        .route("/api/devices", get(live_devices))
        .route("/api/wardriving", get(wardriving))
        .with_state(registry)
}

/// Serve until the shutdown signal flips
pub async fn serve(
    registry: Arc<DeviceRegistry>,
    addr: String,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(&addr).await?;
    info!("web server listening on http://{}", addr);

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
}

async fn live_devices(State(registry): State<Arc<DeviceRegistry>>) -> impl IntoResponse {
    let snapshot = registry.live_snapshot().await;
    ([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(snapshot))
}

async fn wardriving(State(registry): State<Arc<DeviceRegistry>>) -> impl IntoResponse {
    let snapshot = registry.history_snapshot().await;
    ([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(snapshot))
}
