use crate::classify::Classifier;
use crate::config::ScanConfig;
use crate::errors::DiscoveryError;
use crate::persist::PersistenceSink;
use crate::registry::DeviceRegistry;
use crate::scan::AdvertisementSource;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Scan-loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Draining,
    Stopped,
}

/// Drives repeated scan cycles: open the radio window, drain the
/// primitive's accumulated device table through the classifier into the
/// registry, persist the history snapshot, repeat until the stop signal or
/// the session budget fires.
pub struct ScanSession {
    registry: Arc<DeviceRegistry>,
    classifier: Classifier,
    source: Box<dyn AdvertisementSource>,
    sink: Option<PersistenceSink>,
    config: ScanConfig,
    state: ScanState,
}

impl ScanSession {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        classifier: Classifier,
        source: Box<dyn AdvertisementSource>,
        sink: Option<PersistenceSink>,
        config: ScanConfig,
    ) -> Self {
        Self {
            registry,
            classifier,
            source,
            sink,
            config,
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Run the session to completion. Whether it ends on the stop signal,
    /// the session budget, or a scan-primitive failure, the accumulated
    /// history gets one final best-effort flush before this returns.
    pub async fn run(
        &mut self,
        mut stop: watch::Receiver<bool>,
    ) -> Result<(), DiscoveryError> {
        let deadline = match self.config.session_minutes {
            0 => None,
            minutes => Some(Instant::now() + Duration::from_secs(minutes * 60)),
        };
        let window = Duration::from_secs(self.config.scan_window_secs);

        let outcome = self.drive(&mut stop, deadline, window).await;
        self.state = ScanState::Stopped;

        if let Some(sink) = &self.sink {
            let snapshot = self.registry.history_snapshot().await;
            if let Err(err) = sink.flush(&snapshot) {
                warn!("final flush failed: {}", err);
            }
        }

        match outcome {
            Ok(()) => {
                info!(
                    "session stopped after recording {} devices",
                    self.registry.count().await
                );
                Ok(())
            }
            Err(err) => {
                error!("scan primitive failed, stopping session: {}", err);
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        stop: &mut watch::Receiver<bool>,
        deadline: Option<Instant>,
        window: Duration,
    ) -> Result<(), DiscoveryError> {
        loop {
            if *stop.borrow() {
                return Ok(());
            }

            self.state = ScanState::Scanning;
            self.source.start().await?;
            let interrupted = tokio::select! {
                _ = tokio::time::sleep(window) => false,
                _ = stop.changed() => true,
            };
            self.source.stop().await?;

            self.state = ScanState::Draining;
            let advertisements = self.source.discovered().await?;
            let visible = advertisements.len();
            let mut fresh = 0;
            for adv in &advertisements {
                let record = self.classifier.classify(adv);
                if self.registry.observe(record).await {
                    fresh += 1;
                }
            }

            if let Some(sink) = &self.sink {
                let snapshot = self.registry.history_snapshot().await;
                match sink.flush(&snapshot) {
                    Ok(appended) if appended > 0 => {
                        debug!("persisted {} new devices", appended);
                    }
                    Ok(_) => {}
                    Err(err) => warn!("flush failed: {}", err),
                }
            }
            debug!("cycle complete: {} visible, {} new", visible, fresh);

            if interrupted || *stop.borrow() {
                info!("stop requested");
                return Ok(());
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                info!("session budget reached");
                return Ok(());
            }
        }
    }
}
